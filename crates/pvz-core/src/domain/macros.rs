//! Macro utilities for domain port declarations
//!
//! Registry ports are async traits whose futures must be `Send` so handlers
//! can run on a multi-threaded runtime. Writing the return type out by hand
//! for every method is noisy; the `registry_port!` macro turns ergonomic
//! `async fn` declarations into trait methods returning
//! `impl Future<Output = DomainResult<T>> + Send`.
//!
//! # Example
//!
//! ```ignore
//! registry_port! {
//!     /// Lookup port
//!     pub trait Lookup {
//!         /// Fetch a record
//!         async fn fetch(&self, id: u64) -> Option<Record>;
//!     }
//! }
//! ```
//!
//! Expands to:
//!
//! ```ignore
//! pub trait Lookup: Send + Sync {
//!     fn fetch(&self, id: u64)
//!         -> impl Future<Output = DomainResult<Option<Record>>> + Send;
//! }
//! ```
//!
//! Implementors write plain `async fn` bodies.

/// Declare a registry port with `async fn` syntax
///
/// All methods return `DomainResult<T>` and their futures are `Send`.
/// The trait gets `Send + Sync` as supertraits so implementations can be
/// shared behind an `Arc` across request handlers.
#[macro_export]
macro_rules! registry_port {
    (
        $(#[$trait_meta:meta])*
        $vis:vis trait $trait_name:ident {
            $(
                $(#[$method_meta:meta])*
                async fn $method:ident( $($args:tt)* ) -> $ret:ty;
            )*
        }
    ) => {
        $(#[$trait_meta])*
        $vis trait $trait_name: ::std::marker::Send + ::std::marker::Sync {
            $(
                $(#[$method_meta])*
                fn $method( $($args)* ) -> impl ::std::future::Future<
                    Output = $crate::domain::DomainResult<$ret>
                > + ::std::marker::Send;
            )*
        }
    };
}

pub use registry_port;
