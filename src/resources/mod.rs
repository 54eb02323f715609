//! Scene loading and GPU resource creation.
//!
//! - `buffers` classifies buffer regions and uploads them
//! - `binder` walks the scene and plans one draw batch per primitive
//! - `texture` converts decoded images and builds texture bind groups
//!
//! [`load_scene_gltf`] is the only place that touches the `gltf` crate; it
//! copies the document into the parser-independent [`SceneGraph`].

pub mod binder;
pub mod buffers;
pub mod texture;

use std::path::Path;

use anyhow::Context as _;
use gltf::{
    Semantic,
    accessor::{DataType, Dimensions},
    buffer::Target,
    mesh::Mode,
};

use crate::data_structures::scene_graph::{
    ARRAY_BUFFER, Accessor, AccessorKind, BufferView, ComponentType, ELEMENT_ARRAY_BUFFER, Image,
    Material, Mesh, Node, PixelFormat, Primitive, PrimitiveMode, Scene, SceneGraph, TextureRef,
};

/// Reads a `.gltf` or `.glb` file with its buffers and images.
pub fn load_scene_gltf(path: impl AsRef<Path>) -> anyhow::Result<SceneGraph> {
    let path = path.as_ref();
    let (document, buffers, images) =
        gltf::import(path).with_context(|| format!("failed to import {}", path.display()))?;

    let graph = SceneGraph {
        default_scene: document.default_scene().map(|scene| scene.index()),
        scenes: document
            .scenes()
            .map(|scene| Scene {
                nodes: scene.nodes().map(|node| node.index()).collect(),
            })
            .collect(),
        nodes: document
            .nodes()
            .map(|node| Node {
                name: node.name().map(str::to_string),
                mesh: node.mesh().map(|mesh| mesh.index()),
                children: node.children().map(|child| child.index()).collect(),
            })
            .collect(),
        meshes: document
            .meshes()
            .map(|mesh| Mesh {
                name: mesh.name().map(str::to_string),
                primitives: mesh.primitives().map(|p| convert_primitive(&p)).collect(),
            })
            .collect(),
        accessors: document.accessors().map(|a| convert_accessor(&a)).collect(),
        buffer_views: document
            .views()
            .map(|view| BufferView {
                buffer: view.buffer().index(),
                byte_offset: view.offset(),
                byte_length: view.length(),
                byte_stride: view.stride(),
                target: view.target().map(|target| match target {
                    Target::ArrayBuffer => ARRAY_BUFFER,
                    Target::ElementArrayBuffer => ELEMENT_ARRAY_BUFFER,
                }),
            })
            .collect(),
        buffers: buffers.into_iter().map(|data| data.0).collect(),
        materials: document
            .materials()
            .map(|material| Material {
                name: material.name().map(str::to_string),
                base_color_texture: material
                    .pbr_metallic_roughness()
                    .base_color_texture()
                    .map(|info| info.texture().index()),
            })
            .collect(),
        textures: document
            .textures()
            .map(|texture| TextureRef {
                source: Some(texture.source().index()),
            })
            .collect(),
        images: images.into_iter().map(convert_image).collect(),
    };

    log::info!(
        "Loaded {}: {} nodes, {} meshes, {} buffer regions, {} images",
        path.display(),
        graph.nodes.len(),
        graph.meshes.len(),
        graph.buffer_views.len(),
        graph.images.len()
    );
    Ok(graph)
}

fn semantic_name(semantic: &Semantic) -> String {
    match semantic {
        Semantic::Positions => "POSITION".to_string(),
        Semantic::Normals => "NORMAL".to_string(),
        Semantic::Tangents => "TANGENT".to_string(),
        Semantic::Colors(set) => format!("COLOR_{set}"),
        Semantic::TexCoords(set) => format!("TEXCOORD_{set}"),
        Semantic::Joints(set) => format!("JOINTS_{set}"),
        Semantic::Weights(set) => format!("WEIGHTS_{set}"),
        #[allow(unreachable_patterns)]
        other => format!("{other:?}"),
    }
}

fn convert_primitive(primitive: &gltf::Primitive<'_>) -> Primitive {
    Primitive {
        attributes: primitive
            .attributes()
            .map(|(semantic, accessor)| (semantic_name(&semantic), accessor.index()))
            .collect(),
        indices: primitive.indices().map(|accessor| accessor.index()),
        mode: match primitive.mode() {
            Mode::Points => PrimitiveMode::Points,
            Mode::Lines => PrimitiveMode::Lines,
            Mode::LineLoop => PrimitiveMode::LineLoop,
            Mode::LineStrip => PrimitiveMode::LineStrip,
            Mode::Triangles => PrimitiveMode::Triangles,
            Mode::TriangleStrip => PrimitiveMode::TriangleStrip,
            Mode::TriangleFan => PrimitiveMode::TriangleFan,
        },
        material: primitive.material().index(),
    }
}

fn convert_accessor(accessor: &gltf::Accessor<'_>) -> Accessor {
    Accessor {
        kind: match accessor.dimensions() {
            Dimensions::Scalar => AccessorKind::Scalar,
            Dimensions::Vec2 => AccessorKind::Vec2,
            Dimensions::Vec3 => AccessorKind::Vec3,
            Dimensions::Vec4 => AccessorKind::Vec4,
            Dimensions::Mat2 => AccessorKind::Mat2,
            Dimensions::Mat3 => AccessorKind::Mat3,
            Dimensions::Mat4 => AccessorKind::Mat4,
        },
        component_type: match accessor.data_type() {
            DataType::I8 => ComponentType::I8,
            DataType::U8 => ComponentType::U8,
            DataType::I16 => ComponentType::I16,
            DataType::U16 => ComponentType::U16,
            DataType::U32 => ComponentType::U32,
            DataType::F32 => ComponentType::F32,
        },
        normalized: accessor.normalized(),
        byte_offset: accessor.offset(),
        count: accessor.count(),
        buffer_view: accessor.view().map(|view| view.index()),
    }
}

fn convert_image(data: gltf::image::Data) -> Image {
    use gltf::image::Format;

    let format = match data.format {
        Format::R8 => PixelFormat::R8,
        Format::R8G8 => PixelFormat::R8G8,
        Format::R8G8B8 => PixelFormat::R8G8B8,
        Format::R8G8B8A8 => PixelFormat::R8G8B8A8,
        other => PixelFormat::Other(format!("{other:?}")),
    };
    Image {
        width: data.width,
        height: data.height,
        format,
        pixels: data.pixels,
    }
}
