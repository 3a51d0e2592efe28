use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "figdom_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn local_dir_finds_rendered_nodes_by_asset_name() {
    let tmp = temp_dir("export_nodes");
    std::fs::create_dir_all(&tmp).unwrap();
    std::fs::write(tmp.join(asset_file_name("1:2")), b"png").unwrap();
    std::fs::write(tmp.join(asset_file_name("1:3")), b"").unwrap();

    let mut dir = LocalAssetDir::new(&tmp);
    let ids = vec!["1:2".to_owned(), "1:3".to_owned(), "9:9".to_owned()];
    let found = dir.export_nodes(&ids).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found["1:2"], tmp.join(asset_file_name("1:2")));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn local_dir_resolves_image_fills_by_stem() {
    let tmp = temp_dir("export_fills");
    std::fs::create_dir_all(tmp.join("images")).unwrap();
    std::fs::write(tmp.join("images").join("abc.png"), b"x").unwrap();
    std::fs::write(tmp.join("images").join("abc.jpg"), b"x").unwrap();

    let mut dir = LocalAssetDir::new(&tmp);
    let refs = vec!["abc".to_owned(), "zzz".to_owned()];
    let found = dir.resolve_image_fills(&refs).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found["abc"], tmp.join("images").join("abc.jpg"));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn missing_directory_resolves_nothing() {
    let mut dir = LocalAssetDir::new(temp_dir("export_missing"));
    let resolved =
        ResolvedAssets::collect(&mut dir, &["1:1".to_owned()], &["r".to_owned()]).unwrap();
    assert_eq!(resolved, ResolvedAssets::default());
}

#[test]
fn no_export_yields_empty_maps() {
    let resolved = ResolvedAssets::collect(&mut NoExport, &["1:1".to_owned()], &[]).unwrap();
    assert!(resolved.exported.is_empty());
    assert!(resolved.image_fills.is_empty());
}

#[test]
fn file_in_place_of_the_directory_is_an_asset_error() {
    let tmp = temp_dir("export_not_dir");
    std::fs::write(&tmp, b"not a dir").unwrap();

    let mut dir = LocalAssetDir::new(&tmp);
    let err = ResolvedAssets::collect(&mut dir, &["1:1".to_owned()], &[]).unwrap_err();
    assert!(matches!(err, FigdomError::Asset(_)));
    assert!(err.to_string().contains("is not a directory"));
    assert!(matches!(
        dir.resolve_image_fills(&["r".to_owned()]),
        Err(FigdomError::Asset(_))
    ));

    std::fs::remove_file(&tmp).ok();
}
