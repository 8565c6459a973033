pub mod decode;
pub mod encode;
pub mod fetch;
pub mod kinds;
