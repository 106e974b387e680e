use crate::config::TensorLayout;
use crate::image_classifier::interface::InferenceError;
use image::{imageops, DynamicImage, ImageFormat, RgbImage};
use tract_onnx::prelude::tract_ndarray::Array4;

pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, InferenceError> {
    let format = image::guess_format(bytes)?;

    match format {
        ImageFormat::Jpeg | ImageFormat::Png => {
            Ok(image::load_from_memory_with_format(bytes, format)?)
        }
        other => Err(InferenceError::UnsupportedFormat(format!("{:?}", other))),
    }
}

/// Stretches the image to exactly `width` x `height` RGB, ignoring aspect ratio.
pub fn resize_image(
    image: &DynamicImage,
    width: u32,
    height: u32,
    filter: imageops::FilterType,
) -> RgbImage {
    let rgb = image.to_rgb8();
    if rgb.width() == width && rgb.height() == height {
        return rgb;
    }

    imageops::resize(&rgb, width, height, filter)
}

/// Scales intensities to [0, 1] and adds a batch dimension of 1.
pub fn image_to_batch(image: &RgbImage, layout: TensorLayout) -> Array4<f32> {
    let shape = layout.batch_shape(image.height() as usize, image.width() as usize);

    Array4::from_shape_fn(shape, |(_, a, b, c)| {
        let (y, x, channel) = match layout {
            TensorLayout::Nhwc => (a, b, c),
            TensorLayout::Nchw => (b, c, a),
        };
        let pixel = image.get_pixel(x as u32, y as u32);
        pixel[channel] as f32 / 255.0
    })
}
