#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;

use std::fmt;

use geom::{GeomMeshDiagnostics, PolyMesh, ScrewOptions, generate_screw};
use serde::Serialize;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

/// Mesh payload handed to JS: flat polygon lists plus diagnostics.
#[derive(Debug, Serialize, Clone, PartialEq)]
struct MeshExport<'a> {
    vertices: &'a [[f64; 3]],
    faces: &'a [Vec<u32>],
    smooth: &'a [bool],
    #[serde(skip_serializing_if = "Option::is_none")]
    normals: Option<&'a [[f64; 3]]>,
    diagnostics: DiagnosticsExport,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
struct DiagnosticsExport {
    vertex_count: usize,
    face_count: usize,
    quad_count: usize,
    triangle_count: usize,
    ngon_count: usize,
    welded_vertex_count: usize,
    collapsed_face_count: usize,
    open_edge_count: usize,
    non_manifold_edge_count: usize,
    summary: String,
    warnings: Vec<String>,
}

impl From<&GeomMeshDiagnostics> for DiagnosticsExport {
    fn from(diag: &GeomMeshDiagnostics) -> Self {
        Self {
            vertex_count: diag.vertex_count,
            face_count: diag.face_count,
            quad_count: diag.quad_count,
            triangle_count: diag.triangle_count,
            ngon_count: diag.ngon_count,
            welded_vertex_count: diag.welded_vertex_count,
            collapsed_face_count: diag.collapsed_face_count,
            open_edge_count: diag.open_edge_count,
            non_manifold_edge_count: diag.non_manifold_edge_count,
            summary: diag.summary(),
            warnings: diag.warnings.clone(),
        }
    }
}

fn mesh_export<'a>(mesh: &'a PolyMesh, diagnostics: &GeomMeshDiagnostics) -> MeshExport<'a> {
    MeshExport {
        vertices: &mesh.positions,
        faces: &mesh.faces,
        smooth: &mesh.smooth,
        normals: mesh.normals.as_deref(),
        diagnostics: diagnostics.into(),
    }
}

/// Generate a screw mesh from a JS options object.
///
/// Missing fields fall back to [`ScrewOptions::default`]; `undefined` or
/// `null` generates the default screw.
#[wasm_bindgen]
pub fn generate_screw_mesh(options: JsValue) -> Result<JsValue, JsValue> {
    let options: ScrewOptions = if options.is_undefined() || options.is_null() {
        ScrewOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(to_js_error)?
    };

    let (mesh, diagnostics) = generate_screw(&options).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&mesh_export(&mesh, &diagnostics)).map_err(to_js_error)
}

/// Default options as a JS object, for building parameter forms.
#[wasm_bindgen]
pub fn default_screw_options() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&ScrewOptions::default()).map_err(to_js_error)
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::TurnSpec;

    #[test]
    fn mesh_export_serializes_polygons_and_diagnostics() {
        let options = ScrewOptions {
            turns: TurnSpec::Count(1),
            helix_segments: 4,
            winding_segments: 2,
            smooth_faces: false,
            ..ScrewOptions::default()
        };
        let (mesh, diagnostics) = generate_screw(&options).expect("screw");

        let json = serde_json::to_value(mesh_export(&mesh, &diagnostics)).expect("serialize");
        assert_eq!(json["vertices"].as_array().unwrap().len(), 15);
        assert_eq!(json["faces"].as_array().unwrap().len(), 8);
        assert_eq!(json["faces"][0].as_array().unwrap().len(), 4);
        assert_eq!(json["smooth"].as_array().unwrap().len(), 8);
        assert!(json.get("normals").is_none());
        assert_eq!(json["diagnostics"]["quad_count"], 8);
        assert_eq!(json["diagnostics"]["summary"], diagnostics.summary());
    }

    #[test]
    fn mesh_export_includes_normals_when_smooth() {
        let options = ScrewOptions {
            turns: TurnSpec::Count(1),
            helix_segments: 6,
            winding_segments: 3,
            ..ScrewOptions::default()
        };
        let (mesh, diagnostics) = generate_screw(&options).expect("screw");
        let json = serde_json::to_value(mesh_export(&mesh, &diagnostics)).expect("serialize");
        assert_eq!(
            json["normals"].as_array().unwrap().len(),
            mesh.vertex_count()
        );
        assert!(json["smooth"].as_array().unwrap().iter().all(|v| v.as_bool() == Some(true)));
    }
}
