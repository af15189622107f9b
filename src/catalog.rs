//! Template catalog: scan a directory of design templates into a JSON index.
//!
//! Each template lives in its own directory named `psdNNNNN` or `zpsdNNNNN`
//! and holds a preview image and a layered document whose file stems
//! contain the directory name, plus an optional readme page:
//!
//! ```text
//! templates/
//! ├── psd40449/
//! │   ├── psd40449.jpg
//! │   ├── psd40449.psd
//! │   └── readme.htm
//! └── zpsd00012/
//!     ├── zpsd00012.PNG
//!     └── zpsd00012.PSD
//! ```
//!
//! Preview dimensions come from the header sniffer, falling back to
//! [`CatalogConfig::default_dimensions`] when the header is unreadable.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::geometry::Size;
use crate::sniff::{self, DEFAULT_DIMENSIONS, ImageFormat};

/// Catalog format version.
pub const CATALOG_VERSION: &str = "1.0.0";

/// Catalog scanning settings, loadable from TOML.
///
/// ```
/// use zenlayers::catalog::CatalogConfig;
///
/// let config = CatalogConfig::from_toml_str(r#"
///     input_dir = "public/templates/psd"
///     max_tags = 4
/// "#).unwrap();
/// assert_eq!(config.max_tags, 4);
/// assert_eq!(config.public_prefix, "/templates/psd");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory holding one subdirectory per template.
    pub input_dir: PathBuf,
    /// URL prefix for file paths written into the catalog.
    pub public_prefix: String,
    /// Used when a preview header cannot be read.
    pub default_dimensions: Size,
    pub max_tags: usize,
    /// Recognized readme file names, compared case-insensitively.
    pub readme_names: Vec<String>,
    pub preview_extensions: Vec<String>,
    pub document_extensions: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("public/templates/psd"),
            public_prefix: String::from("/templates/psd"),
            default_dimensions: DEFAULT_DIMENSIONS,
            max_tags: 8,
            readme_names: vec!["readme.htm".into(), "说明.htm".into(), "说明.html".into()],
            preview_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
            document_extensions: vec!["psd".into(), "ps".into()],
        }
    }
}

impl CatalogConfig {
    /// Default settings reading templates from `input_dir`.
    pub fn for_dir(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            ..Self::default()
        }
    }

    /// Parse settings from TOML; missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        Ok(toml::from_str(raw)?)
    }

    /// Read settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }
}

/// Catalog error.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("template directory {0} does not exist")]
    MissingInput(PathBuf),
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog config")]
    Config(#[from] toml::de::Error),
    #[error("failed to encode catalog")]
    Json(#[from] serde_json::Error),
}

/// Template category, derived from the template number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Poster,
    SocialMedia,
    Composite,
    Other,
}

impl Category {
    fn tags(self) -> &'static [&'static str] {
        match self {
            Self::Poster => &["poster", "promotion", "print", "large-format"],
            Self::SocialMedia => &["social", "web", "sharing", "small-format"],
            Self::Composite => &["general", "multipurpose", "template"],
            Self::Other => &[],
        }
    }
}

/// What a template directory name says about its template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateInfo {
    pub id: String,
    /// First run of digits in the name; 0 when there is none.
    pub number: u64,
    pub name: String,
    pub category: Category,
    pub description: String,
}

/// Classify a template directory name.
///
/// Returns `None` unless the name starts with `psd` or `zpsd`
/// (case-insensitive).
pub fn classify(dir_name: &str) -> Option<TemplateInfo> {
    let lower = dir_name.to_ascii_lowercase();
    let compressed = lower.starts_with("zpsd");
    if !compressed && !lower.starts_with("psd") {
        return None;
    }
    let number = first_number(dir_name);

    let (category, name, description) = match number {
        40000..41000 => (
            Category::Poster,
            format!("Poster template {number}"),
            "Poster design for product promotion",
        ),
        41000..42000 => (
            Category::SocialMedia,
            format!("Social media template {number}"),
            "Design template for social media",
        ),
        _ if compressed => (
            Category::Composite,
            format!("Composite template {number}"),
            "Multipurpose design template",
        ),
        _ => (
            Category::Other,
            format!("Design template {number}"),
            "PSD design template",
        ),
    };

    Some(TemplateInfo {
        id: dir_name.to_owned(),
        number,
        name,
        category,
        description: description.to_owned(),
    })
}

/// Tags for a template: category tags, then format tags, then generic
/// ones, deduplicated in order and capped at `max`.
pub fn generate_tags(category: Category, id: &str, max: usize) -> Vec<String> {
    let lower = id.to_ascii_lowercase();
    let format_tags: &[&str] = if lower.starts_with("zpsd") {
        &["compressed", "composite"]
    } else if lower.contains("psd") {
        &["PSD", "source"]
    } else {
        &[]
    };

    let mut tags: Vec<String> = Vec::with_capacity(max);
    let all = category
        .tags()
        .iter()
        .chain(format_tags)
        .chain(&["design", "template", "editable"]);
    for tag in all {
        if tags.len() == max {
            break;
        }
        if !tags.iter().any(|t| t == tag) {
            tags.push((*tag).to_owned());
        }
    }
    tags
}

fn first_number(s: &str) -> u64 {
    s.split(|c: char| !c.is_ascii_digit())
        .find(|run| !run.is_empty())
        .and_then(|run| run.parse().ok())
        .unwrap_or(0)
}

/// One catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateEntry {
    pub id: String,
    pub number: u64,
    pub name: String,
    pub description: String,
    /// Public path of the preview image.
    pub image: String,
    /// Public path of the layered document.
    pub psd: String,
    pub width: u32,
    pub height: u32,
    pub category: Category,
    pub tags: Vec<String>,
    pub has_readme: bool,
    pub readme_path: Option<String>,
    /// `YYYY-MM-DD`.
    pub created_at: String,
    /// `YYYY-MM-DD`.
    pub updated_at: String,
}

/// Scan every template directory under `config.input_dir`, sorted by
/// template number.
///
/// Directories that are not templates, lack a preview or document, or
/// cannot be read are skipped with a warning. Only a missing input
/// directory fails the scan.
pub fn scan_templates(config: &CatalogConfig) -> Result<Vec<TemplateEntry>, CatalogError> {
    let root = &config.input_dir;
    if !root.is_dir() {
        return Err(CatalogError::MissingInput(root.clone()));
    }
    log::info!("scanning templates in {}", root.display());

    let mut entries = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry in {}: {e}", root.display());
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Some(template) = scan_template_dir(entry.path(), config) {
            entries.push(template);
        }
    }
    entries.sort_by_key(|t| t.number);
    log::info!("found {} templates", entries.len());
    Ok(entries)
}

/// Build the entry for one template directory.
///
/// `None`, with a warning, when the directory is not a complete template
/// or cannot be read.
pub fn scan_template_dir(dir: &Path, config: &CatalogConfig) -> Option<TemplateEntry> {
    let Some(dir_name) = dir.file_name().and_then(|n| n.to_str()) else {
        log::warn!("skipping {}: name is not UTF-8", dir.display());
        return None;
    };
    let Some(info) = classify(dir_name) else {
        log::warn!("skipping {dir_name}: not a template directory");
        return None;
    };

    let files = match list_files(dir) {
        Ok(files) => files,
        Err(e) => {
            log::warn!("skipping {dir_name}: {e}");
            return None;
        }
    };
    let needle = dir_name.to_lowercase();
    let find = |extensions: &[String]| {
        files.iter().find(|f| {
            let (stem, ext) = split_extension(f);
            extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) && stem.to_lowercase().contains(&needle)
        })
    };

    let Some(preview) = find(config.preview_extensions.as_slice()) else {
        log::warn!("skipping {dir_name}: no preview image");
        return None;
    };
    let Some(document) = find(config.document_extensions.as_slice()) else {
        log::warn!("skipping {dir_name}: no layered document");
        return None;
    };
    let readme = files
        .iter()
        .find(|f| config.readme_names.iter().any(|r| r.to_lowercase() == f.to_lowercase()));

    let size = preview_size(&dir.join(preview), config.default_dimensions);
    let (created, modified) = dir_dates(dir);
    let public = |file: &str| format!("{}/{dir_name}/{file}", config.public_prefix.trim_end_matches('/'));

    log::info!("added {} ({dir_name}, {size})", info.name);
    Some(TemplateEntry {
        tags: generate_tags(info.category, &info.id, config.max_tags),
        id: info.id,
        number: info.number,
        name: info.name,
        description: info.description,
        image: public(preview),
        psd: public(document),
        width: size.width,
        height: size.height,
        category: info.category,
        has_readme: readme.is_some(),
        readme_path: readme.map(|r| public(r)),
        created_at: created,
        updated_at: modified,
    })
}

/// UTF-8 file names directly inside `dir`, sorted.
fn list_files(dir: &Path) -> Result<Vec<String>, walkdir::Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            if let Some(name) = entry.file_name().to_str() {
                files.push(name.to_owned());
            }
        }
    }
    Ok(files)
}

/// `("photo", "jpg")` for `"photo.jpg"`; the extension is empty when absent.
fn split_extension(file: &str) -> (&str, &str) {
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext),
        _ => (file, ""),
    }
}

/// Sniffed preview dimensions, or `fallback`.
fn preview_size(path: &Path, fallback: Size) -> Size {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("cannot read {}: {e}", path.display());
            return fallback;
        }
    };
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ImageFormat::from_extension);
    let header = match format {
        Some(format) => sniff::sniff(&data, format),
        None => sniff::sniff_auto(&data),
    };
    if !header.is_known() {
        log::warn!("cannot read dimensions of {}, using {fallback}", path.display());
    }
    header.or_default(fallback)
}

/// Creation and modification dates of `dir`; today when unavailable.
fn dir_dates(dir: &Path) -> (String, String) {
    let meta = fs::metadata(dir).ok();
    let now = SystemTime::now();
    let created = meta.as_ref().and_then(|m| m.created().ok()).unwrap_or(now);
    let modified = meta.as_ref().and_then(|m| m.modified().ok()).unwrap_or(now);
    (date_string(created), date_string(modified))
}

/// `YYYY-MM-DD` in UTC.
fn date_string(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format("%Y-%m-%d").to_string()
}

/// `YYYY-MM-DDTHH:MM:SSZ` in UTC.
fn timestamp_string(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Width and height extremes over all templates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeRange {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_templates: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub with_readme: usize,
    /// `None` for an empty catalog.
    pub size_range: Option<SizeRange>,
}

/// The catalog document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// `YYYY-MM-DDTHH:MM:SSZ`.
    pub generated_at: String,
    pub version: String,
    pub count: usize,
    pub templates: Vec<TemplateEntry>,
    pub stats: CatalogStats,
    /// Categories present, in category order.
    pub categories: Vec<Category>,
    /// Naming rules, present when the catalog has templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<LayoutGuide>,
    /// Expected layout, present when no template was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_structure: Option<DirectoryGuide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// How template directories and their files must be named.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutGuide {
    pub base_path: String,
    pub pattern: String,
    pub file_naming: String,
    pub example: LayoutExample,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutExample {
    pub directory: String,
    pub files: Vec<String>,
}

/// The layout an empty template directory is expected to get.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryGuide {
    pub base: String,
    pub pattern: String,
    pub expected_files: Vec<String>,
}

/// `{stem}.{ext}` for the first preview and document extension, then the
/// first readme name, each followed by its role.
fn example_files(stem: &str, config: &CatalogConfig, roles: [&str; 3]) -> Vec<String> {
    let first = |list: &[String], fallback: &str| {
        list.first().map_or_else(|| fallback.to_owned(), Clone::clone)
    };
    let preview = first(config.preview_extensions.as_slice(), "jpg");
    let document = first(config.document_extensions.as_slice(), "psd");
    let readme = first(config.readme_names.as_slice(), "readme.htm");
    vec![
        format!("{stem}.{preview} {}", roles[0]).trim_end().to_owned(),
        format!("{stem}.{document} {}", roles[1]).trim_end().to_owned(),
        format!("{readme} {}", roles[2]),
    ]
}

impl Catalog {
    /// Assemble a catalog with statistics over `templates`.
    ///
    /// An empty catalog carries the expected directory layout and
    /// instructions instead of naming rules.
    pub fn build(templates: Vec<TemplateEntry>, config: &CatalogConfig) -> Self {
        let mut by_category = BTreeMap::new();
        for t in &templates {
            *by_category.entry(t.category).or_insert(0) += 1;
        }
        let size_range = templates.iter().fold(None, |range: Option<SizeRange>, t| {
            Some(match range {
                None => SizeRange {
                    min_width: t.width,
                    max_width: t.width,
                    min_height: t.height,
                    max_height: t.height,
                },
                Some(r) => SizeRange {
                    min_width: r.min_width.min(t.width),
                    max_width: r.max_width.max(t.width),
                    min_height: r.min_height.min(t.height),
                    max_height: r.max_height.max(t.height),
                },
            })
        });

        let base = format!("{}/", config.public_prefix.trim_end_matches('/'));
        let (structure, directory_structure, instructions) = if templates.is_empty() {
            log::warn!("no templates found");
            let guide = DirectoryGuide {
                base,
                pattern: "psdXXXXX or zpsdXXXXX".to_owned(),
                expected_files: example_files(
                    "psdXXXXX",
                    config,
                    ["(preview image)", "(layered document)", "(optional readme)"],
                ),
            };
            let hint = "Create one psdXXXXX directory per template holding a preview image \
                        and a layered document named after the directory";
            (None, Some(guide), Some(hint.to_owned()))
        } else {
            let guide = LayoutGuide {
                base_path: base,
                pattern: "psdXXXXX (XXXXX is the template number)".to_owned(),
                file_naming: "preview and document file names must contain the directory name"
                    .to_owned(),
                example: LayoutExample {
                    directory: "psd40449".to_owned(),
                    files: example_files("psd40449", config, ["", "", "(optional)"]),
                },
            };
            (Some(guide), None, None)
        };

        Self {
            generated_at: timestamp_string(Utc::now()),
            version: CATALOG_VERSION.to_owned(),
            count: templates.len(),
            stats: CatalogStats {
                total_templates: templates.len(),
                with_readme: templates.iter().filter(|t| t.has_readme).count(),
                by_category: by_category.clone(),
                size_range,
            },
            categories: by_category.into_keys().collect(),
            templates,
            structure,
            directory_structure,
            instructions,
        }
    }

    /// Scan `config.input_dir` and build the catalog.
    pub fn scan(config: &CatalogConfig) -> Result<Self, CatalogError> {
        scan_templates(config).map(|templates| Self::build(templates, config))
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut data = sniff::PNG_SIGNATURE.to_vec();
        data.extend_from_slice(&[0, 0, 0, 13]);
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[8, 6, 0, 0, 0]);
        data
    }

    fn template_dir(root: &Path, name: &str, files: &[(&str, Vec<u8>)]) {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        for (file, data) in files {
            fs::write(dir.join(file), data).unwrap();
        }
    }

    // ── classification ──────────────────────────────────────────────────

    #[test]
    fn classify_by_number_range() {
        let poster = classify("psd40449").unwrap();
        assert_eq!(poster.number, 40449);
        assert_eq!(poster.category, Category::Poster);
        assert_eq!(poster.name, "Poster template 40449");

        assert_eq!(classify("PSD41000").unwrap().category, Category::SocialMedia);
        assert_eq!(classify("zpsd00012").unwrap().category, Category::Composite);
        assert_eq!(classify("psd123").unwrap().category, Category::Other);
    }

    #[test]
    fn number_range_wins_over_prefix() {
        assert_eq!(classify("zpsd40001").unwrap().category, Category::Poster);
    }

    #[test]
    fn classify_rejects_other_names() {
        assert_eq!(classify("images"), None);
        assert_eq!(classify("mypsd1"), None);
    }

    #[test]
    fn missing_number_is_zero() {
        let info = classify("psd-draft").unwrap();
        assert_eq!(info.number, 0);
        assert_eq!(info.category, Category::Other);
    }

    // ── tags ────────────────────────────────────────────────────────────

    #[test]
    fn poster_tags_are_capped() {
        let tags = generate_tags(Category::Poster, "psd40449", 8);
        assert_eq!(
            tags,
            ["poster", "promotion", "print", "large-format", "PSD", "source", "design", "template"]
        );
    }

    #[test]
    fn composite_tags_are_deduplicated() {
        let tags = generate_tags(Category::Composite, "zpsd00012", 8);
        assert_eq!(
            tags,
            ["general", "multipurpose", "template", "compressed", "composite", "design", "editable"]
        );
    }

    #[test]
    fn other_tags() {
        assert_eq!(
            generate_tags(Category::Other, "psd1", 8),
            ["PSD", "source", "design", "template", "editable"]
        );
        assert_eq!(generate_tags(Category::Other, "psd1", 2), ["PSD", "source"]);
    }

    // ── dates ───────────────────────────────────────────────────────────

    #[test]
    fn timestamp_format() {
        let t = std::time::UNIX_EPOCH + std::time::Duration::from_secs(19_723 * 86_400 + 3_723);
        assert_eq!(timestamp_string(DateTime::<Utc>::from(t)), "2024-01-01T01:02:03Z");
        assert_eq!(date_string(t), "2024-01-01");
    }

    #[test]
    fn dates_before_epoch() {
        let t = std::time::UNIX_EPOCH - std::time::Duration::from_secs(1);
        assert_eq!(date_string(t), "1969-12-31");
    }

    // ── scanning ────────────────────────────────────────────────────────

    #[test]
    fn scans_complete_templates_sorted_by_number() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        template_dir(
            root,
            "psd41002",
            &[("psd41002.png", png(1080, 1080)), ("psd41002.psd", b"8BPS".to_vec())],
        );
        template_dir(
            root,
            "psd40449",
            &[
                ("PSD40449.PNG", png(3000, 4000)),
                ("psd40449.PSD", b"8BPS".to_vec()),
                ("readme.htm", b"<html></html>".to_vec()),
            ],
        );
        template_dir(root, "psd40500", &[("psd40500.psd", b"8BPS".to_vec())]);
        template_dir(root, "assets", &[("logo.png", png(1, 1))]);
        fs::write(root.join("notes.txt"), b"x").unwrap();

        let entries = scan_templates(&CatalogConfig::for_dir(root)).unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["psd40449", "psd41002"]);

        let first = &entries[0];
        assert_eq!((first.width, first.height), (3000, 4000));
        assert_eq!(first.image, "/templates/psd/psd40449/PSD40449.PNG");
        assert_eq!(first.psd, "/templates/psd/psd40449/psd40449.PSD");
        assert!(first.has_readme);
        assert_eq!(first.readme_path.as_deref(), Some("/templates/psd/psd40449/readme.htm"));
        assert_eq!(first.created_at.len(), 10);
        assert!(!entries[1].has_readme);
    }

    #[test]
    fn unreadable_preview_uses_default_dimensions() {
        let tmp = tempfile::tempdir().unwrap();
        template_dir(
            tmp.path(),
            "zpsd7",
            &[("zpsd7-preview.jpg", b"not a jpeg".to_vec()), ("zpsd7.psd", b"8BPS".to_vec())],
        );
        let entries = scan_templates(&CatalogConfig::for_dir(tmp.path())).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!((entries[0].width, entries[0].height), (1920, 1080));
    }

    #[test]
    fn unreadable_template_dir_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let config = CatalogConfig::for_dir(tmp.path());
        assert_eq!(scan_template_dir(&tmp.path().join("psd40001"), &config), None);
    }

    #[test]
    fn missing_input_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = scan_templates(&CatalogConfig::for_dir(tmp.path().join("nope"))).unwrap_err();
        assert!(matches!(err, CatalogError::MissingInput(_)));
    }

    // ── catalog ─────────────────────────────────────────────────────────

    fn entry(id: &str, category: Category, width: u32, height: u32, readme: bool) -> TemplateEntry {
        TemplateEntry {
            id: id.into(),
            number: first_number(id),
            name: id.into(),
            description: String::new(),
            image: String::new(),
            psd: String::new(),
            width,
            height,
            category,
            tags: Vec::new(),
            has_readme: readme,
            readme_path: None,
            created_at: "2024-01-01".into(),
            updated_at: "2024-01-01".into(),
        }
    }

    #[test]
    fn catalog_stats() {
        let catalog = Catalog::build(
            vec![
                entry("psd40001", Category::Poster, 800, 1200, true),
                entry("psd40002", Category::Poster, 2000, 1000, false),
                entry("zpsd3", Category::Composite, 640, 640, false),
            ],
            &CatalogConfig::default(),
        );
        assert_eq!(catalog.version, "1.0.0");
        assert_eq!(catalog.generated_at.len(), "2024-01-01T00:00:00Z".len());
        assert!(catalog.generated_at.ends_with('Z'));
        assert_eq!(catalog.count, 3);
        assert_eq!(catalog.stats.by_category[&Category::Poster], 2);
        assert_eq!(catalog.stats.with_readme, 1);
        assert_eq!(
            catalog.stats.size_range,
            Some(SizeRange {
                min_width: 640,
                max_width: 2000,
                min_height: 640,
                max_height: 1200
            })
        );
        assert_eq!(catalog.categories, [Category::Poster, Category::Composite]);
    }

    #[test]
    fn empty_catalog_has_no_size_range() {
        let catalog = Catalog::build(Vec::new(), &CatalogConfig::default());
        assert_eq!(catalog.count, 0);
        assert_eq!(catalog.stats.size_range, None);
        assert!(catalog.categories.is_empty());
        assert_eq!(catalog.structure, None);

        let guide = catalog.directory_structure.unwrap();
        assert_eq!(guide.base, "/templates/psd/");
        assert_eq!(
            guide.expected_files,
            [
                "psdXXXXX.jpg (preview image)",
                "psdXXXXX.psd (layered document)",
                "readme.htm (optional readme)"
            ]
        );
        assert!(catalog.instructions.is_some());
    }

    #[test]
    fn catalog_names_its_layout() {
        let config = CatalogConfig {
            public_prefix: "/static/psd".into(),
            ..CatalogConfig::default()
        };
        let catalog = Catalog::build(vec![entry("psd40001", Category::Poster, 1, 1, false)], &config);
        assert_eq!(catalog.directory_structure, None);
        assert_eq!(catalog.instructions, None);

        let guide = catalog.structure.unwrap();
        assert_eq!(guide.base_path, "/static/psd/");
        assert_eq!(guide.example.directory, "psd40449");
        assert_eq!(
            guide.example.files,
            ["psd40449.jpg", "psd40449.psd", "readme.htm (optional)"]
        );
    }

    #[test]
    fn catalog_json_uses_camel_case() {
        let templates = vec![entry("psd41001", Category::SocialMedia, 1, 1, false)];
        let json = Catalog::build(templates, &CatalogConfig::default()).to_json().unwrap();
        assert!(json.contains("\"generatedAt\""));
        assert!(json.contains("\"basePath\": \"/templates/psd/\""));
        assert!(!json.contains("\"directoryStructure\""));
        assert!(json.contains("\"social-media\": 1"));
        assert!(json.contains("\"hasReadme\": false"));
    }

    #[test]
    fn config_from_toml() {
        let config = CatalogConfig::from_toml_str(
            r#"
            public_prefix = "/static/"
            default_dimensions = { width = 800, height = 600 }
            "#,
        )
        .unwrap();
        assert_eq!(config.public_prefix, "/static/");
        assert_eq!(config.default_dimensions, Size::new(800, 600));
        assert_eq!(config.max_tags, 8);
        assert!(CatalogConfig::from_toml_str("max_tags = \"many\"").is_err());
    }
}
