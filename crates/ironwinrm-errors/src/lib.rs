pub mod error;
pub mod fault;

pub use error::{AuthenticationError, WinRmError};
pub use fault::{TransportError, WSMAN_FAULT_CODE_OPERATION_TIMEOUT};
