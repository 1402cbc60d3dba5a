//! A converter from TJA(.tja) charts of Taiko no Tatsujin into osu!taiko beatmaps(.osu).
//!
//! The conversion consists of three phases: decoding, interpreting and rendering.
//!
//! - [`decode`] reads the bytes of the file in UTF-8 or Shift_JIS.
//! - [`tja`] interprets the lines into the timing points and hit objects of each course and branch.
//! - [`osu`] flattens them into one stream per branch and renders the `.osu` documents.
//!
//! [`convert`] ties them together for the files on the disk.
//!
//! # Example
//!
//! ```
//! use tja2osu::{osu::beatmap::render_beatmaps, tja::parse_tja};
//!
//! let source = "TITLE:Song\nBPM:150\nOFFSET:0\nCOURSE:Oni\n#START\n1,\n#END\n";
//! let output = parse_tja(source).unwrap();
//! let beatmaps = render_beatmaps(&output.chart);
//! assert_eq!(beatmaps[0].file_name, "Song [Oni] [Normal].osu");
//! assert!(beatmaps[0].text.ends_with("[HitObjects]\n256,192,-25,1,0,0:0:0:0:"));
//! ```

pub mod convert;
pub mod decode;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod osu;
pub mod prelude;
pub mod tja;
