mod channel;
pub use channel::*;

mod gray;
pub use gray::*;
