pub mod enums;
pub mod plan;
pub mod timing;
pub mod todo;

pub use enums::{ActivityEvent, DiaryFormat, FocusPane, UiMode};
pub use plan::PlanResponse;
pub use timing::{format_clock, format_hms};
pub use todo::{any_active, apply_action, apply_named_action, first_active, next_pending, TodoAction, TodoItem};
