//! Static icon catalog
//!
//! Icons are bundled PNG assets. Rules and overrides refer to them by file
//! name (`Sage_1.png`) or base name (`Sage_1`).

/// Bundled icon files.
pub const AVAILABLE_ICONS: &[&str] = &[
    "Coral_1.png",
    "Coral_2.png",
    "Coral_3.png",
    "Coral_4.png",
    "Coral_A.png",
    "Coral_B.png",
    "Coral_C.png",
    "Coral_D.png",
    "DarkTeal_1.png",
    "DarkTeal_2.png",
    "DarkTeal_3.png",
    "DarkTeal_4.png",
    "DarkTeal_A.png",
    "DarkTeal_B.png",
    "DarkTeal_C.png",
    "DarkTeal_D.png",
    "Elastic.png",
    "ElasticDim.png",
    "ElasticGray.png",
    "ElasticSepia.png",
    "ErrorEmails.png",
    "Peach_1.png",
    "Peach_2.png",
    "Peach_3.png",
    "Peach_4.png",
    "Peach_A.png",
    "Peach_B.png",
    "Peach_C.png",
    "Peach_D.png",
    "Sage_1.png",
    "Sage_2.png",
    "Sage_3.png",
    "Sage_4.png",
    "Sage_A.png",
    "Sage_B.png",
    "Sage_C.png",
    "Sage_D.png",
    "Sand_1.png",
    "Sand_2.png",
    "Sand_3.png",
    "Sand_4.png",
    "Sand_A.png",
    "Sand_B.png",
    "Sand_C.png",
    "Sand_D.png",
    "SlateTeal_1.png",
    "SlateTeal_2.png",
    "SlateTeal_3.png",
    "SlateTeal_4.png",
    "SlateTeal_A.png",
    "SlateTeal_B.png",
    "SlateTeal_C.png",
    "SlateTeal_D.png",
    "SoftTurquise_1.png",
    "SoftTurquise_2.png",
    "SoftTurquise_3.png",
    "SoftTurquise_4.png",
    "SoftTurquise_A.png",
    "SoftTurquise_B.png",
    "SoftTurquise_C.png",
    "SoftTurquise_D.png",
];

/// Default directory of the bundled icons, relative to the extension root.
pub const DEFAULT_ICON_BASE: &str = "icons/";

/// Find the bundled file for an icon name. Accepts the file name or the
/// name without its extension.
pub fn lookup_icon_file(name: &str) -> Option<&'static str> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    AVAILABLE_ICONS
        .iter()
        .copied()
        .find(|file| *file == name || strip_extension(file) == name)
}

fn strip_extension(file: &str) -> &str {
    match file.rfind('.') {
        Some(pos) if pos > 0 => &file[..pos],
        _ => file,
    }
}

/// An icon as offered to the configure dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconEntry {
    pub name: &'static str,
    pub url: String,
}

/// Resolves icon names into asset URLs under a base URL.
#[derive(Debug, Clone)]
pub struct IconCatalog {
    base_url: String,
}

impl Default for IconCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_ICON_BASE)
    }
}

impl IconCatalog {
    /// `base_url` is joined with the file name, adding a `/` if missing.
    pub fn new(base_url: &str) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.is_empty() && !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Asset URL for `name`, or "" (no icon) when the name is unknown.
    pub fn resolve(&self, name: &str) -> String {
        match lookup_icon_file(name) {
            Some(file) => format!("{}{}", self.base_url, file),
            None => String::new(),
        }
    }

    pub fn available(&self) -> Vec<IconEntry> {
        AVAILABLE_ICONS
            .iter()
            .map(|file| IconEntry {
                name: file,
                url: format!("{}{}", self.base_url, file),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_size() {
        assert_eq!(AVAILABLE_ICONS.len(), 61);
    }

    #[test]
    fn test_lookup_by_file_and_base_name() {
        assert_eq!(lookup_icon_file("Sage_1.png"), Some("Sage_1.png"));
        assert_eq!(lookup_icon_file("Sage_1"), Some("Sage_1.png"));
        assert_eq!(lookup_icon_file("  ElasticDim "), Some("ElasticDim.png"));
        assert_eq!(lookup_icon_file("Elastic"), Some("Elastic.png"));
        assert_eq!(lookup_icon_file("sage_1"), None);
        assert_eq!(lookup_icon_file(""), None);
        assert_eq!(lookup_icon_file("Missing"), None);
    }

    #[test]
    fn test_resolve_with_base() {
        let catalog = IconCatalog::new("chrome-extension://abc/icons");
        assert_eq!(catalog.resolve("Coral_A"), "chrome-extension://abc/icons/Coral_A.png");
        assert_eq!(catalog.resolve("nope"), "");
    }

    #[test]
    fn test_default_catalog() {
        let catalog = IconCatalog::default();
        assert_eq!(catalog.resolve("Peach_D.png"), "icons/Peach_D.png");
        let entries = catalog.available();
        assert_eq!(entries.len(), AVAILABLE_ICONS.len());
        assert_eq!(entries[0].url, "icons/Coral_1.png");
    }
}
