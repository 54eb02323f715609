use crate::{
    data_structures::{
        scene_graph::{Image, PixelFormat},
        texture::{self, Texture},
    },
    error::LoadError,
};

/// Bind group layout of the base colour texture (group 1 of the scene pipeline).
pub fn diffuse_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("diffuse_texture_bind_group_layout"),
    })
}

pub fn diffuse_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    label: &str,
) -> wgpu::BindGroup {
    let fallback;
    let sampler = match &texture.sampler {
        Some(sampler) => sampler,
        None => {
            fallback = texture::create_default_sampler(device);
            &fallback
        }
    };
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some(label),
    })
}

/// Expands an 8-bit image with 1 to 4 channels to RGBA8.
///
/// One channel becomes grey, two become grey with alpha, three become opaque
/// RGB. Anything else is reported as unsupported.
pub fn to_rgba(index: usize, source: &Image) -> Result<image::RgbaImage, LoadError> {
    let channels = match &source.format {
        PixelFormat::R8 => 1,
        PixelFormat::R8G8 => 2,
        PixelFormat::R8G8B8 => 3,
        PixelFormat::R8G8B8A8 => 4,
        PixelFormat::Other(name) => {
            return Err(LoadError::UnsupportedImageFormat {
                image: index,
                format: name.clone(),
            });
        }
    };
    let expected = source.width as usize * source.height as usize * channels;
    let size_mismatch = || LoadError::ImageSizeMismatch {
        image: index,
        expected,
        actual: source.pixels.len(),
    };
    if source.pixels.len() != expected {
        return Err(size_mismatch());
    }

    let (width, height, pixels) = (source.width, source.height, source.pixels.clone());
    let dynamic = match channels {
        1 => image::GrayImage::from_raw(width, height, pixels).map(image::DynamicImage::ImageLuma8),
        2 => image::GrayAlphaImage::from_raw(width, height, pixels)
            .map(image::DynamicImage::ImageLumaA8),
        3 => image::RgbImage::from_raw(width, height, pixels).map(image::DynamicImage::ImageRgb8),
        _ => image::RgbaImage::from_raw(width, height, pixels).map(image::DynamicImage::ImageRgba8),
    }
    .ok_or_else(size_mismatch)?;

    Ok(dynamic.to_rgba8())
}
