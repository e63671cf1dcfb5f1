mod shutdown;
mod window;

pub mod prelude {
    pub use crate::shutdown::{DelegatedShutdownListener, ShutdownHandle};
    pub use crate::window::window_for;
}
