pub mod evidence;
pub mod export;
pub mod handlers;
pub mod pipeline;
pub mod scorer;
