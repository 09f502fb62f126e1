mod filter_bar;
mod login_form;
mod register_form;
mod session_header;
mod task_form;
mod task_list;
mod task_list_row;

pub use filter_bar::FilterBar;
pub use login_form::LoginForm;
pub use register_form::RegisterForm;
pub use session_header::SessionHeader;
pub use task_form::TaskForm;
pub use task_list::TaskList;
pub use task_list_row::TaskListRow;
