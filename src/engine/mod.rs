//! Core engine: view state, request tracking, search helpers and the
//! dashboard controller that ties them to the providers and renderer.

pub mod dashboard;
pub mod flight;
pub mod search;
pub mod view;

pub use dashboard::{Dashboard, Event, SearchIntent, Services, Session, Settings};
pub use view::ViewState;
