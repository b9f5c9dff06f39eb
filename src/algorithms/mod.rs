pub mod mass;
pub mod pipeline;
pub mod resolve;
pub mod search;
pub mod sliding;
pub mod verify;
