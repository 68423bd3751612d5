//! Tests for the common crate
//!
//! Covers the public vocabulary the stage crates rely on: identifier
//! validation, precision parsing and artifact path determinism.

use common::{ArtifactKind, ArtifactLayout, ModelId, Precision};
use proptest::prelude::*;
use std::path::PathBuf;

#[test]
fn test_layout_names_follow_model() {
    let layout = ArtifactLayout::new("./models", ModelId::new("yolov8n").unwrap());

    let names: Vec<String> = ArtifactKind::ALL
        .iter()
        .map(|kind| layout.file_name(*kind))
        .collect();
    assert_eq!(names, vec!["yolov8n.pt", "yolov8n.onnx", "yolov8n.engine"]);
}

#[test]
fn test_distinct_models_never_collide() {
    let a = ArtifactLayout::new("out", ModelId::new("detector-small").unwrap());
    let b = ArtifactLayout::new("out", ModelId::new("detector-large").unwrap());

    for kind in ArtifactKind::ALL {
        assert_ne!(a.path(kind), b.path(kind));
    }
}

#[test]
fn test_precision_rejects_unknown_modes() {
    for value in ["fp8", "bf16", "float16", "int4", "--fp16"] {
        assert!(value.parse::<Precision>().is_err(), "accepted {}", value);
    }
}

proptest! {
    #[test]
    fn prop_layout_is_deterministic(name in "[a-z][a-z0-9_-]{0,24}", dir in "[a-z]{1,8}") {
        let first = ArtifactLayout::new(PathBuf::from(&dir), ModelId::new(name.clone()).unwrap());
        let second = ArtifactLayout::new(PathBuf::from(&dir), ModelId::new(name.clone()).unwrap());

        for kind in ArtifactKind::ALL {
            prop_assert_eq!(first.path(kind), second.path(kind));
            prop_assert_eq!(
                first.path(kind),
                PathBuf::from(&dir).join(format!("{}.{}", name, kind.extension()))
            );
        }
    }

    #[test]
    fn prop_valid_ids_stay_inside_output_dir(name in "[A-Za-z0-9][A-Za-z0-9._-]{0,24}") {
        prop_assume!(!name.contains(".."));
        let id = ModelId::new(name).unwrap();
        let layout = ArtifactLayout::new("/out", id);
        for kind in ArtifactKind::ALL {
            let path = layout.path(kind);
            prop_assert_eq!(path.parent(), Some(std::path::Path::new("/out")));
        }
    }
}
