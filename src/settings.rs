use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::data::MelParams;
use crate::rendering::ColormapId;

/// Tunables for one run. Defaults are the fixed analysis and animation
/// configuration; an INI file passed on the command line may override them.
/// Nothing is ever written back to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    // ── Analysis ──
    pub n_fft: usize,
    pub hop_length: usize,
    pub n_mels: usize,
    pub top_db: f32,

    // ── Animation ──
    pub interval_ms: u64,
    pub slice_columns: usize,

    // ── Display ──
    pub colormap: String, // "Viridis", "Magma", "Inferno", "Greyscale"
    pub window_width: i32,
    pub window_height: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Analysis
            n_fft: 2048,
            hop_length: 1024,
            n_mels: 128,
            top_db: 80.0,

            // Animation
            interval_ms: 50,
            slice_columns: 10,

            // Display
            colormap: "Viridis".to_string(),
            window_width: 1000,
            window_height: 560,
        }
    }
}

impl Settings {
    /// Defaults, overridden by `path` when one is given and readable.
    pub fn load(path: Option<&Path>) -> Self {
        let mut settings = Self::default();
        let Some(path) = path else {
            return settings;
        };
        match fs::read_to_string(path) {
            Ok(content) => {
                settings.parse_ini(&content);
                tracing::info!("[Settings] Loaded {}", path.display());
            }
            Err(e) => {
                tracing::warn!("Could not read {}: {}. Using defaults.", path.display(), e);
            }
        }
        settings
    }

    pub fn mel_params(&self) -> MelParams {
        MelParams {
            n_fft: self.n_fft,
            hop_length: self.hop_length,
            n_mels: self.n_mels,
            top_db: self.top_db,
            ..MelParams::default()
        }
    }

    pub fn colormap_id(&self) -> ColormapId {
        ColormapId::from_name(&self.colormap).unwrap_or(ColormapId::Viridis)
    }

    pub fn to_ini(&self) -> String {
        let mut s = String::new();
        s.push_str("# wavescope settings\n");
        s.push_str("# Pass with --settings <file>. Missing keys keep their defaults.\n\n");

        s.push_str("[Analysis]\n");
        s.push_str(&format!("n_fft = {}\n", self.n_fft));
        s.push_str(&format!("hop_length = {}\n", self.hop_length));
        s.push_str(&format!("n_mels = {}\n", self.n_mels));
        s.push_str("# top_db: dynamic range kept below the loudest cell\n");
        s.push_str(&format!("top_db = {}\n", self.top_db));
        s.push('\n');

        s.push_str("[Animation]\n");
        s.push_str(&format!("interval_ms = {}\n", self.interval_ms));
        s.push_str(&format!("slice_columns = {}\n", self.slice_columns));
        s.push('\n');

        s.push_str("[Display]\n");
        s.push_str("# Colormaps: Viridis, Magma, Inferno, Greyscale\n");
        s.push_str(&format!("colormap = {}\n", self.colormap));
        s.push_str(&format!("window_width = {}\n", self.window_width));
        s.push_str(&format!("window_height = {}\n", self.window_height));

        s
    }

    /// Apply `key = value` lines over the current values.
    pub fn parse_ini(&mut self, content: &str) {
        let map = parse_ini_to_map(content);

        // Analysis
        set_parsed(&map, "n_fft", &mut self.n_fft);
        set_parsed(&map, "hop_length", &mut self.hop_length);
        set_parsed(&map, "n_mels", &mut self.n_mels);
        set_parsed(&map, "top_db", &mut self.top_db);

        // Animation
        set_parsed(&map, "interval_ms", &mut self.interval_ms);
        set_parsed(&map, "slice_columns", &mut self.slice_columns);

        // Display
        if let Some(v) = map.get("colormap") {
            if ColormapId::from_name(v).is_some() {
                self.colormap = v.clone();
            } else {
                tracing::warn!("[Settings] Unknown colormap '{}', keeping {}", v, self.colormap);
            }
        }
        set_parsed(&map, "window_width", &mut self.window_width);
        set_parsed(&map, "window_height", &mut self.window_height);

        // Zero would stall the animation or divide by zero downstream
        if self.slice_columns == 0 {
            self.slice_columns = Self::default().slice_columns;
        }
        if self.interval_ms == 0 {
            self.interval_ms = Self::default().interval_ms;
        }
    }
}

fn set_parsed<T: FromStr>(map: &HashMap<String, String>, key: &str, field: &mut T) {
    if let Some(v) = map.get(key) {
        match v.parse() {
            Ok(n) => *field = n,
            Err(_) => tracing::warn!("[Settings] Ignoring bad value for {}: '{}'", key, v),
        }
    }
}

/// Parse INI content into a flat key-value map (section headers are ignored,
/// keys are globally unique in our format).
fn parse_ini_to_map(content: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
            continue;
        }
        if let Some((key, val)) = line.split_once('=') {
            map.insert(key.trim().to_string(), val.trim().to_string());
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_analysis_config() {
        let p = Settings::default().mel_params();
        assert_eq!(p.n_fft, 2048);
        assert_eq!(p.hop_length, 1024);
        assert_eq!(p.n_mels, 128);
        assert_eq!(p.top_db, 80.0);
    }

    #[test]
    fn test_ini_text_roundtrips() {
        let mut original = Settings::default();
        original.n_mels = 64;
        original.colormap = "Magma".to_string();
        original.interval_ms = 40;

        let mut restored = Settings::default();
        restored.parse_ini(&original.to_ini());
        assert_eq!(restored, original);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let ini = "[Analysis]
n_fft = lots
hop_length = 512
[Animation]
slice_columns = 0
[Display]
colormap = Plaid
";
        let mut s = Settings::default();
        s.parse_ini(ini);

        assert_eq!(s.n_fft, 2048);
        assert_eq!(s.hop_length, 512);
        assert_eq!(s.slice_columns, 10);
        assert_eq!(s.colormap, "Viridis");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let s = Settings::load(Some(Path::new("/no/such/settings.ini")));
        assert_eq!(s, Settings::default());
    }
}
