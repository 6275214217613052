pub mod files;
pub mod session;
pub mod todo_store;

pub use files::{
    atomic_write, config_file, ensure_data_dir, init_local_data_dir, log_file, session_file,
    todos_file,
};
pub use session::{clear_session, load_session, save_session, StoredSession};
pub use todo_store::{load_todos, save_todos};
