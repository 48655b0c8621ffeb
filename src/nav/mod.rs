//! Browsing core: breadcrumbs, listing cache, pagination and the navigation
//! state machine that ties them together.

pub mod breadcrumbs;
pub mod cache;
pub mod engine;
pub mod paginator;

pub use breadcrumbs::BreadcrumbStack;
pub use cache::ListingCache;
pub use engine::{NavEvent, NavigationEngine, ScreenModel, Transition};
