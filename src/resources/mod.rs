pub mod impl_cached;
#[cfg(test)]
pub mod impl_fake;
pub mod impl_fs;
pub mod impl_tract_onnx;
pub mod interface;
pub mod label_mapping;
