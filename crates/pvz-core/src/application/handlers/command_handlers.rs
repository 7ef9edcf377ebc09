//! Command handlers implementing the reception use cases

use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::{
        ApplicationError, ApplicationResult, UseCase, commands::*, handlers::CommandHandler,
    },
    domain::{
        DomainError, Item, PickupPoint, PickupPointId, Reception,
        ports::{PickupPointRepository, ReceptionRepository},
    },
    telemetry,
};

/// Handler for pickup point and reception lifecycle commands
#[derive(Debug)]
pub struct ReceptionCommandHandler<P, R>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
{
    pickup_points: Arc<P>,
    receptions: Arc<R>,
}

impl<P, R> Clone for ReceptionCommandHandler<P, R>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
{
    fn clone(&self) -> Self {
        Self {
            pickup_points: Arc::clone(&self.pickup_points),
            receptions: Arc::clone(&self.receptions),
        }
    }
}

impl<P, R> ReceptionCommandHandler<P, R>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
{
    pub fn new(pickup_points: Arc<P>, receptions: Arc<R>) -> Self {
        Self {
            pickup_points,
            receptions,
        }
    }

    async fn ensure_pickup_point(&self, id: PickupPointId) -> ApplicationResult<PickupPoint> {
        self.pickup_points
            .find_pickup_point(id)
            .await?
            .ok_or(ApplicationError::Domain(DomainError::PickupPointNotFound(id)))
    }

    async fn load_open_reception(&self, id: PickupPointId) -> ApplicationResult<Reception> {
        self.receptions
            .find_open_reception(id)
            .await?
            .ok_or(ApplicationError::NoOpenReception(id))
    }

    async fn create_pickup_point(
        &self,
        command: CreatePickupPointCommand,
    ) -> ApplicationResult<PickupPoint> {
        let point = PickupPoint::new(&command.city)?;
        self.pickup_points.create_pickup_point(point.clone()).await?;

        info!(pickup_point_id = %point.id(), city = %point.city(), "pickup point registered");
        Ok(point)
    }

    async fn open_reception(&self, command: OpenReceptionCommand) -> ApplicationResult<Reception> {
        let point_id = command.pickup_point_id;
        self.ensure_pickup_point(point_id).await?;

        if self.receptions.find_open_reception(point_id).await?.is_some() {
            return Err(DomainError::DuplicateOpenReception(point_id).into());
        }

        // The registry re-checks atomically; a racing open surfaces as
        // DuplicateOpenReception from create_reception.
        let reception = Reception::open(point_id);
        self.receptions.create_reception(reception.clone()).await?;

        info!(pickup_point_id = %point_id, reception_id = %reception.id(), "reception opened");
        Ok(reception)
    }

    async fn add_item(&self, command: AddItemCommand) -> ApplicationResult<Item> {
        let point_id = command.pickup_point_id;
        self.ensure_pickup_point(point_id).await?;
        let reception = self.load_open_reception(point_id).await?;

        // Sequence is assigned by the registry.
        let item = Item::new(&command.item_type, reception.id())?;
        let stored = self
            .receptions
            .append_item(item)
            .await
            .map_err(|err| closed_meanwhile(err, point_id))?;

        info!(
            pickup_point_id = %point_id,
            reception_id = %stored.reception_id(),
            item_id = %stored.id(),
            sequence = stored.sequence().value(),
            "item received"
        );
        Ok(stored)
    }

    async fn remove_last_item(&self, command: RemoveLastItemCommand) -> ApplicationResult<Item> {
        let point_id = command.pickup_point_id;
        self.ensure_pickup_point(point_id).await?;
        let reception = self.load_open_reception(point_id).await?;

        let removed = self
            .receptions
            .remove_last_item(reception.id())
            .await
            .map_err(|err| closed_meanwhile(err, point_id))?;

        info!(
            pickup_point_id = %point_id,
            reception_id = %reception.id(),
            item_id = %removed.id(),
            sequence = removed.sequence().value(),
            "last item removed"
        );
        Ok(removed)
    }

    async fn close_reception(
        &self,
        command: CloseReceptionCommand,
    ) -> ApplicationResult<Reception> {
        let point_id = command.pickup_point_id;
        self.ensure_pickup_point(point_id).await?;
        let mut reception = self.load_open_reception(point_id).await?;

        reception.close()?;
        self.receptions
            .update_reception_status(reception.clone())
            .await
            .map_err(|err| match err {
                DomainError::AlreadyClosed(_) => ApplicationError::NoOpenReception(point_id),
                other => other.into(),
            })?;

        // Items may have landed after the snapshot was read.
        let reception = self
            .receptions
            .find_reception(reception.id())
            .await?
            .unwrap_or(reception);

        info!(
            pickup_point_id = %point_id,
            reception_id = %reception.id(),
            items = reception.items().len(),
            "reception closed"
        );
        Ok(reception)
    }
}

/// A reception closed between lookup and write is no longer the open one
fn closed_meanwhile(err: DomainError, point_id: PickupPointId) -> ApplicationError {
    match err {
        DomainError::ReceptionNotOpen(_) => ApplicationError::NoOpenReception(point_id),
        other => other.into(),
    }
}

impl<P, R> CommandHandler<CreatePickupPointCommand> for ReceptionCommandHandler<P, R>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
{
    type Response = PickupPoint;

    #[instrument(skip(self), fields(use_case = CreatePickupPointCommand::NAME))]
    async fn handle(&self, command: CreatePickupPointCommand) -> ApplicationResult<PickupPoint> {
        let result = self.create_pickup_point(command).await;
        telemetry::record::<CreatePickupPointCommand, _>(&result);
        result
    }
}

impl<P, R> CommandHandler<OpenReceptionCommand> for ReceptionCommandHandler<P, R>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
{
    type Response = Reception;

    #[instrument(skip(self), fields(use_case = OpenReceptionCommand::NAME))]
    async fn handle(&self, command: OpenReceptionCommand) -> ApplicationResult<Reception> {
        let result = self.open_reception(command).await;
        telemetry::record::<OpenReceptionCommand, _>(&result);
        result
    }
}

impl<P, R> CommandHandler<AddItemCommand> for ReceptionCommandHandler<P, R>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
{
    type Response = Item;

    #[instrument(skip(self), fields(use_case = AddItemCommand::NAME))]
    async fn handle(&self, command: AddItemCommand) -> ApplicationResult<Item> {
        let result = self.add_item(command).await;
        telemetry::record::<AddItemCommand, _>(&result);
        result
    }
}

impl<P, R> CommandHandler<RemoveLastItemCommand> for ReceptionCommandHandler<P, R>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
{
    type Response = Item;

    #[instrument(skip(self), fields(use_case = RemoveLastItemCommand::NAME))]
    async fn handle(&self, command: RemoveLastItemCommand) -> ApplicationResult<Item> {
        let result = self.remove_last_item(command).await;
        telemetry::record::<RemoveLastItemCommand, _>(&result);
        result
    }
}

impl<P, R> CommandHandler<CloseReceptionCommand> for ReceptionCommandHandler<P, R>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
{
    type Response = Reception;

    #[instrument(skip(self), fields(use_case = CloseReceptionCommand::NAME))]
    async fn handle(&self, command: CloseReceptionCommand) -> ApplicationResult<Reception> {
        let result = self.close_reception(command).await;
        telemetry::record::<CloseReceptionCommand, _>(&result);
        result
    }
}
