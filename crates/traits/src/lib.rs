pub mod events;
pub mod page;

pub use events::{Callback, ClickEvent, ClickHandler, FrameCallback, ScrollBehavior, Subscription};
pub use page::{Page, PageError};
