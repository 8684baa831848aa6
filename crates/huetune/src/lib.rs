#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use huetune_image as image;

#[doc(inline)]
pub use huetune_imgproc as imgproc;

#[doc(inline)]
pub use huetune_io as io;
