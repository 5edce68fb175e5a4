pub mod capture;
pub mod detection;
pub mod history;
pub mod imaging;
pub mod pipeline;
pub mod shared;
