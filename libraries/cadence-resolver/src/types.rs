//! Resolution result and mirror wire types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A source the output layer can actually open
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayableHandle {
    /// File on local storage, existence already checked
    Local(PathBuf),

    /// Time-limited stream link from a backend mirror
    Stream {
        /// Direct stream URL
        url: String,
        /// Advertised bitrate
        bitrate_kbps: u32,
        /// Codec name as reported by the mirror
        codec: String,
    },
}

/// Manifest returned by a mirror for one track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamManifest {
    /// Backend identifier the manifest answers for
    pub track_id: String,

    /// Available stream variants, in no particular order
    pub variants: Vec<StreamVariant>,
}

/// One playable rendition inside a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamVariant {
    /// Direct stream URL
    pub url: String,

    /// Bitrate in kbit/s
    pub bitrate_kbps: u32,

    /// Codec name (`mp3`, `aac`, `opus`, ...)
    pub codec: String,
}

/// Codecs the output layer can decode
pub(crate) const SUPPORTED_CODECS: &[&str] = &["mp3", "aac", "m4a", "opus", "flac", "ogg"];

impl StreamVariant {
    /// Whether this variant uses a codec the output layer can decode
    pub(crate) fn is_supported(&self) -> bool {
        let codec = self.codec.to_ascii_lowercase();
        SUPPORTED_CODECS.contains(&codec.as_str())
    }
}

impl StreamManifest {
    /// The highest-bitrate variant with a supported codec
    pub(crate) fn best_variant(&self) -> Option<&StreamVariant> {
        self.variants
            .iter()
            .filter(|v| v.is_supported())
            .max_by_key(|v| v.bitrate_kbps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(codec: &str, bitrate_kbps: u32) -> StreamVariant {
        StreamVariant {
            url: format!("https://cdn.example.com/{}-{}", codec, bitrate_kbps),
            bitrate_kbps,
            codec: codec.to_string(),
        }
    }

    #[test]
    fn best_variant_prefers_highest_supported_bitrate() {
        let manifest = StreamManifest {
            track_id: "abc".to_string(),
            variants: vec![
                variant("mp3", 128),
                variant("opus", 256),
                variant("mp3", 320),
            ],
        };

        assert_eq!(manifest.best_variant().unwrap().bitrate_kbps, 320);
    }

    #[test]
    fn best_variant_skips_unsupported_codecs() {
        let manifest = StreamManifest {
            track_id: "abc".to_string(),
            variants: vec![variant("wma", 512), variant("aac", 160)],
        };

        assert_eq!(manifest.best_variant().unwrap().codec, "aac");
    }

    #[test]
    fn codec_matching_is_case_insensitive() {
        let manifest = StreamManifest {
            track_id: "abc".to_string(),
            variants: vec![variant("FLAC", 900)],
        };

        assert!(manifest.best_variant().is_some());
    }

    #[test]
    fn empty_manifest_has_no_variant() {
        let manifest = StreamManifest {
            track_id: "abc".to_string(),
            variants: vec![],
        };

        assert!(manifest.best_variant().is_none());
    }
}
