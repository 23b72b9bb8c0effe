pub mod impl_fake;
#[cfg(feature = "webcam")]
pub mod impl_nokhwa;
pub mod interface;
