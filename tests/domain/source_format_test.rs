use voxsure::domain::{SourceFormat, SourceKind};

#[test]
fn given_mesh_extensions_when_resolving_then_kind_is_mesh() {
    for name in ["heli.stl", "heli.OBJ", "dir/part.v2.stl"] {
        let format = SourceFormat::from_filename(name).unwrap();
        assert_eq!(format.kind(), SourceKind::Mesh, "{}", name);
    }
}

#[test]
fn given_image_extensions_when_resolving_then_kind_is_image() {
    assert_eq!(
        SourceFormat::from_filename("shot.png").unwrap(),
        SourceFormat::Png
    );
    assert_eq!(
        SourceFormat::from_filename("shot.jpg").unwrap(),
        SourceFormat::Jpeg
    );
    assert_eq!(
        SourceFormat::from_filename("shot.JPEG").unwrap(),
        SourceFormat::Jpeg
    );
    assert_eq!(SourceFormat::Jpeg.kind(), SourceKind::Image);
}

#[test]
fn given_unknown_or_missing_extension_when_resolving_then_is_rejected() {
    let err = SourceFormat::from_filename("notes.txt").unwrap_err();
    assert_eq!(err.extension, "txt");

    assert!(SourceFormat::from_filename("README").is_err());
}
