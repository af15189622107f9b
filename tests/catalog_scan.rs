//! Catalog scanning over a temporary template tree.

#![cfg(feature = "catalog")]

use std::fs;
use std::path::Path;

use zenlayers::catalog::{Catalog, CatalogConfig, Category};

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n', 0, 0, 0, 13];
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&height.to_be_bytes());
    data
}

fn jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00];
    data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&[3, 1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]);
    data
}

fn add(root: &Path, dir: &str, files: &[(&str, Vec<u8>)]) {
    let dir = root.join(dir);
    fs::create_dir_all(&dir).unwrap();
    for (name, data) in files {
        fs::write(dir.join(name), data).unwrap();
    }
}

#[test]
fn scan_and_serialize() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    add(
        root,
        "psd41005",
        &[("psd41005.jpg", jpeg(1080, 1350)), ("psd41005.psd", b"8BPS".to_vec())],
    );
    add(
        root,
        "psd40449",
        &[
            ("psd40449.png", png(4961, 7016)),
            ("psd40449.psd", b"8BPS".to_vec()),
            ("说明.htm", b"<p>fonts</p>".to_vec()),
        ],
    );
    add(
        root,
        "zpsd00012",
        &[("zpsd00012.JPEG", b"corrupt".to_vec()), ("zpsd00012.PS", b"%!PS".to_vec())],
    );
    add(root, "psd99999", &[("other.jpg", jpeg(1, 1)), ("psd99999.psd", b"8BPS".to_vec())]);

    let catalog = Catalog::scan(&CatalogConfig::for_dir(root)).unwrap();
    assert_eq!(catalog.count, 3);

    let ids: Vec<_> = catalog.templates.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["zpsd00012", "psd40449", "psd41005"]);

    let composite = &catalog.templates[0];
    assert_eq!(composite.category, Category::Composite);
    assert_eq!((composite.width, composite.height), (1920, 1080));

    let poster = &catalog.templates[1];
    assert_eq!(poster.category, Category::Poster);
    assert_eq!((poster.width, poster.height), (4961, 7016));
    assert_eq!(poster.readme_path.as_deref(), Some("/templates/psd/psd40449/说明.htm"));
    assert_eq!(poster.tags.len(), 8);

    let social = &catalog.templates[2];
    assert_eq!(social.category, Category::SocialMedia);
    assert_eq!((social.width, social.height), (1080, 1350));

    assert_eq!(catalog.stats.with_readme, 1);
    let range = catalog.stats.size_range.unwrap();
    assert_eq!((range.min_width, range.max_height), (1080, 7016));
    assert_eq!(
        catalog.categories,
        [Category::Poster, Category::SocialMedia, Category::Composite]
    );

    let json = catalog.to_json().unwrap();
    let back: Catalog = serde_json::from_str(&json).unwrap();
    assert_eq!(back, catalog);
}

#[test]
fn custom_prefix_and_tag_limit() {
    let tmp = tempfile::tempdir().unwrap();
    add(
        tmp.path(),
        "psd40001",
        &[("psd40001.png", png(10, 10)), ("psd40001.psd", b"8BPS".to_vec())],
    );
    let mut config = CatalogConfig::from_toml_str(
        r#"
        public_prefix = "https://cdn.example.com/t/"
        max_tags = 3
        "#,
    )
    .unwrap();
    config.input_dir = tmp.path().to_path_buf();

    let catalog = Catalog::scan(&config).unwrap();
    let entry = &catalog.templates[0];
    assert_eq!(entry.image, "https://cdn.example.com/t/psd40001/psd40001.png");
    assert_eq!(entry.tags, ["poster", "promotion", "print"]);
}

#[test]
fn config_file_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("catalog.toml");
    fs::write(&path, "max_tags = 5\nreadme_names = [\"about.html\"]\n").unwrap();
    let config = CatalogConfig::load(&path).unwrap();
    assert_eq!(config.max_tags, 5);
    assert_eq!(config.readme_names, ["about.html"]);
    assert!(CatalogConfig::load(&tmp.path().join("missing.toml")).is_err());
}

#[test]
fn empty_tree_describes_expected_layout() {
    let tmp = tempfile::tempdir().unwrap();
    add(tmp.path(), "assets", &[("logo.png", png(1, 1))]);

    let catalog = Catalog::scan(&CatalogConfig::for_dir(tmp.path())).unwrap();
    assert_eq!(catalog.count, 0);
    assert!(catalog.structure.is_none());

    let json: serde_json::Value = serde_json::from_str(&catalog.to_json().unwrap()).unwrap();
    assert_eq!(json["directoryStructure"]["base"], "/templates/psd/");
    assert_eq!(json["directoryStructure"]["expectedFiles"].as_array().unwrap().len(), 3);
    assert!(json["instructions"].is_string());
    assert!(json.get("structure").is_none());
}
