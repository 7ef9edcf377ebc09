//! Query handlers for pickup point and reception listings

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationResult, UseCase,
        handlers::QueryHandler,
        queries::{
            ListPickupPointsQuery, ListReceptionsQuery, PickupPointOverview, PickupPointsResponse,
        },
    },
    domain::{
        DomainError, Reception,
        ports::{Pagination, PickupPointFilter, PickupPointRepository, ReceptionRepository},
    },
    telemetry,
};

/// Handler for read-side queries
#[derive(Debug)]
pub struct ReceptionQueryHandler<P, R>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
{
    pickup_points: Arc<P>,
    receptions: Arc<R>,
}

impl<P, R> Clone for ReceptionQueryHandler<P, R>
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

impl<P, R> ReceptionQueryHandler<P, R>
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

    async fn list_pickup_points(
        &self,
        query: ListPickupPointsQuery,
    ) -> ApplicationResult<PickupPointsResponse> {
        let pagination = Pagination::new(query.page, query.page_size);

        let filter = if query.received_from.is_some() || query.received_to.is_some() {
            let ids = self
                .receptions
                .pickup_points_with_receptions_between(query.received_from, query.received_to)
                .await?;
            PickupPointFilter::only(ids)
        } else {
            PickupPointFilter::all()
        };

        let points = self
            .pickup_points
            .list_pickup_points(filter, pagination)
            .await?;

        let mut overviews = Vec::with_capacity(points.len());
        for pickup_point in points {
            let receptions = self.receptions.list_receptions(pickup_point.id()).await?;
            overviews.push(PickupPointOverview {
                pickup_point,
                receptions,
            });
        }

        debug!(
            page = pagination.page,
            page_size = pagination.page_size,
            returned = overviews.len(),
            "pickup points listed"
        );

        Ok(PickupPointsResponse {
            page: pagination.page,
            page_size: pagination.page_size,
            pickup_points: overviews,
        })
    }

    async fn list_receptions(&self, query: ListReceptionsQuery) -> ApplicationResult<Vec<Reception>> {
        let point_id = query.pickup_point_id;
        if self
            .pickup_points
            .find_pickup_point(point_id)
            .await?
            .is_none()
        {
            return Err(DomainError::PickupPointNotFound(point_id).into());
        }

        Ok(self.receptions.list_receptions(point_id).await?)
    }
}

impl<P, R> QueryHandler<ListPickupPointsQuery> for ReceptionQueryHandler<P, R>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
{
    type Response = PickupPointsResponse;

    #[instrument(skip(self), fields(use_case = ListPickupPointsQuery::NAME))]
    async fn handle(&self, query: ListPickupPointsQuery) -> ApplicationResult<PickupPointsResponse> {
        let result = self.list_pickup_points(query).await;
        telemetry::record::<ListPickupPointsQuery, _>(&result);
        result
    }
}

impl<P, R> QueryHandler<ListReceptionsQuery> for ReceptionQueryHandler<P, R>
where
    P: PickupPointRepository,
    R: ReceptionRepository,
{
    type Response = Vec<Reception>;

    #[instrument(skip(self), fields(use_case = ListReceptionsQuery::NAME))]
    async fn handle(&self, query: ListReceptionsQuery) -> ApplicationResult<Vec<Reception>> {
        let result = self.list_receptions(query).await;
        telemetry::record::<ListReceptionsQuery, _>(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::{ApplicationError, commands::*, handlers::{CommandHandler, command_handlers::ReceptionCommandHandler}},
        domain::PickupPointId,
        infrastructure::adapters::{InMemoryPickupPointRepository, InMemoryReceptionRepository},
    };
    use chrono::{Duration, Utc};

    struct Fixture {
        commands: ReceptionCommandHandler<InMemoryPickupPointRepository, InMemoryReceptionRepository>,
        queries: ReceptionQueryHandler<InMemoryPickupPointRepository, InMemoryReceptionRepository>,
    }

    fn fixture() -> Fixture {
        let pickup_points = Arc::new(InMemoryPickupPointRepository::new());
        let receptions = Arc::new(InMemoryReceptionRepository::new());
        Fixture {
            commands: ReceptionCommandHandler::new(pickup_points.clone(), receptions.clone()),
            queries: ReceptionQueryHandler::new(pickup_points, receptions),
        }
    }

    async fn point_with_items(fixture: &Fixture, city: &str, kinds: &[&str]) -> PickupPointId {
        let point = fixture
            .commands
            .handle(CreatePickupPointCommand { city: city.into() })
            .await
            .unwrap()
            .id();
        fixture
            .commands
            .handle(OpenReceptionCommand {
                pickup_point_id: point,
            })
            .await
            .unwrap();
        for kind in kinds {
            fixture
                .commands
                .handle(AddItemCommand {
                    pickup_point_id: point,
                    item_type: (*kind).into(),
                })
                .await
                .unwrap();
        }
        point
    }

    #[tokio::test]
    async fn test_list_includes_nested_receptions() {
        let fixture = fixture();
        let point = point_with_items(&fixture, "Kazan", &["clothing", "footwear"]).await;

        let response = fixture
            .queries
            .handle(ListPickupPointsQuery::default())
            .await
            .unwrap();

        assert_eq!(response.page, 1);
        assert_eq!(response.page_size, 10);
        assert_eq!(response.pickup_points.len(), 1);

        let overview = &response.pickup_points[0];
        assert_eq!(overview.pickup_point.id(), point);
        assert_eq!(overview.receptions.len(), 1);
        assert_eq!(overview.receptions[0].items().len(), 2);
    }

    #[tokio::test]
    async fn test_date_range_excludes_points_without_receptions() {
        let fixture = fixture();
        let busy = point_with_items(&fixture, "Moscow", &["electronics"]).await;
        fixture
            .commands
            .handle(CreatePickupPointCommand {
                city: "Kazan".into(),
            })
            .await
            .unwrap();

        let now = Utc::now();
        let response = fixture
            .queries
            .handle(ListPickupPointsQuery {
                received_from: Some(now - Duration::hours(1)),
                received_to: Some(now + Duration::hours(1)),
                ..Default::default()
            })
            .await
            .unwrap();

        let ids: Vec<_> = response
            .pickup_points
            .iter()
            .map(|overview| overview.pickup_point.id())
            .collect();
        assert_eq!(ids, vec![busy]);

        let future_only = fixture
            .queries
            .handle(ListPickupPointsQuery {
                received_from: Some(now + Duration::hours(1)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(future_only.pickup_points.is_empty());
    }

    #[tokio::test]
    async fn test_list_receptions_for_unknown_point() {
        let fixture = fixture();
        let missing = PickupPointId::new();

        let err = fixture
            .queries
            .handle(ListReceptionsQuery {
                pickup_point_id: missing,
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApplicationError::Domain(DomainError::PickupPointNotFound(missing))
        );
    }
}
