//! Filename timestamp extraction for radar volume files.
//!
//! Radar archives encode the acquisition time in the file name, one convention per
//! source. Extracting that time is far cheaper than decoding a volume, so the
//! orchestrator uses this module to discard files outside the analysis window before
//! the reader ever opens them. Each convention is a [`NamingConvention`] variant; an
//! unrecognized configuration tag is a fatal error, while an unparseable file name is
//! an expected per-file condition and simply excludes the file.

use std::path::Path;
use std::str::FromStr;

use hifitime::Epoch;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::cyclotrace_errors::CyclotraceError;

/// The closed set of file-naming conventions understood by the time filter.
///
/// Selected once at configuration time from the source-format tag and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamingConvention {
    /// NCDC Level II archives: `<radar><yyyyMMdd>_<hhmmss>[.ext]`
    NcdcLevel2,
    /// LDM Level II feeds, covering the UCAR, NRL and Purdue sub-conventions
    LdmLevel2,
    /// Synthetic/model sources: no meaningful acquisition time, never filtered
    Model,
    /// DORADE sweep files: `swp.<yyyMMddhhmmss>.<radar>...` with years offset from 1900
    Dorade,
    /// CF-Radial files: `<radar>_<yyyyMMdd>_<hhmmss>[.ext]`
    CfRadial,
}

impl FromStr for NamingConvention {
    type Err = CyclotraceError;

    /// Resolve a configuration tag to its convention.
    ///
    /// An unknown tag means the configuration is unusable: the caller must not fall
    /// back to a default and silently analyze files from the wrong source.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "NCDCLEVELII" => Ok(NamingConvention::NcdcLevel2),
            "LDMLEVELII" => Ok(NamingConvention::LdmLevel2),
            "MODEL" => Ok(NamingConvention::Model),
            "DORADE" => Ok(NamingConvention::Dorade),
            "CFRADIAL" => Ok(NamingConvention::CfRadial),
            _ => Err(CyclotraceError::UnknownNamingConvention(tag.to_string())),
        }
    }
}

/// An inclusive UTC analysis window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: Epoch,
    pub end: Epoch,
}

impl TimeWindow {
    pub fn new(start: Epoch, end: Epoch) -> Self {
        TimeWindow { start, end }
    }

    /// `true` iff `start <= t <= end`.
    pub fn contains(&self, t: Epoch) -> bool {
        self.start <= t && t <= self.end
    }
}

impl NamingConvention {
    /// Extract the acquisition timestamp encoded in `file_path`'s name.
    ///
    /// Arguments
    /// ---------
    /// * `file_path`: path of a candidate volume file; only its base name is used.
    /// * `radar_name`: the site identifier embedded in some conventions (e.g. `KTLX`),
    ///   removed from the name before the time fields are read.
    ///
    /// Return
    /// ------
    /// * `Some(epoch)` in the UTC scale, or `None` when the name does not follow the
    ///   convention. A `None` is an expected per-file condition, not an error; the
    ///   model convention always returns `None` because its files carry no time.
    pub fn timestamp(&self, file_path: &str, radar_name: &str) -> Option<Epoch> {
        match self {
            NamingConvention::NcdcLevel2 => ncdc_timestamp(file_path, radar_name),
            NamingConvention::LdmLevel2 => ldm_timestamp(file_path, radar_name),
            NamingConvention::Model => None,
            NamingConvention::Dorade => dorade_timestamp(file_path),
            NamingConvention::CfRadial => cfradial_timestamp(file_path),
        }
    }

    /// Decide whether `file_path` belongs to the analysis window.
    ///
    /// The model convention accepts every file. For all others, a file is in range
    /// iff its extracted timestamp lies inside the inclusive window; a failed
    /// extraction always excludes the file.
    pub fn file_in_window(&self, file_path: &str, radar_name: &str, window: &TimeWindow) -> bool {
        match self {
            NamingConvention::Model => true,
            _ => self
                .timestamp(file_path, radar_name)
                .is_some_and(|t| window.contains(t)),
        }
    }
}

/// The file name up to (but not including) its final extension.
fn base_name(file_path: &str) -> &str {
    Path::new(file_path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("")
}

/// Fixed-width `yyyyMMdd` field.
fn parse_date(s: &str) -> Option<(i32, u8, u8)> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((
        s[0..4].parse().ok()?,
        s[4..6].parse().ok()?,
        s[6..8].parse().ok()?,
    ))
}

/// Fixed-width `hhmmss` field.
fn parse_time_hms(s: &str) -> Option<(u8, u8, u8)> {
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((
        s[0..2].parse().ok()?,
        s[2..4].parse().ok()?,
        s[4..6].parse().ok()?,
    ))
}

/// Fixed-width `hhmm` field.
fn parse_time_hm(s: &str) -> Option<(u8, u8)> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((s[0..2].parse().ok()?, s[2..4].parse().ok()?))
}

fn epoch_utc(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Epoch> {
    Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, second, 0).ok()
}

/// `<radar><yyyyMMdd>_<hhmmss>`: strip the radar name, then read both fields.
fn ncdc_timestamp(file_path: &str, radar_name: &str) -> Option<Epoch> {
    let timepart = base_name(file_path).replace(radar_name, "");
    let mut segments = timepart.split('_');
    let (year, month, day) = parse_date(segments.next()?)?;
    let (hour, minute, second) = parse_time_hms(segments.next()?)?;
    epoch_utc(year, month, day, hour, minute, second)
}

/// LDM Level II names come in three sub-conventions, disambiguated by markers:
/// a `Level2` substring (UCAR), an embedded dot (NRL), or an underscore (Purdue).
fn ldm_timestamp(file_path: &str, radar_name: &str) -> Option<Epoch> {
    let stem = base_name(file_path);

    if stem.contains("Level2") {
        // UCAR: Level2_<radar>_<yyyyMMdd>_<hhmm>
        let cleaned = stem.replace(".ar2v", "");
        let segments: Vec<&str> = cleaned.split('_').collect();
        let (year, month, day) = parse_date(segments.get(2)?)?;
        let (hour, minute) = parse_time_hm(segments.get(3)?)?;
        epoch_utc(year, month, day, hour, minute, 0)
    } else if stem.contains('.') {
        // NRL: <radar>.<yyyyMMdd...hhmmss>; date is the segment's first 8
        // characters, time its last 6
        let timepart = stem.replace(radar_name, "");
        let segments: Vec<&str> = timepart.split('.').collect();
        let seg = segments.get(1)?;
        let (year, month, day) = parse_date(seg.get(..8)?)?;
        let (hour, minute, second) = parse_time_hms(seg.get(seg.len().checked_sub(6)?..)?)?;
        epoch_utc(year, month, day, hour, minute, second)
    } else if stem.contains('_') {
        // Purdue: <radar>_<yyyyMMdd>[_<hhmm>]
        let timepart = stem.replace(radar_name, "");
        let segments: Vec<&str> = timepart.split('_').collect();
        let (year, month, day) = parse_date(segments.get(1)?)?;
        match segments.get(2) {
            Some(time_seg) => {
                let (hour, minute) = parse_time_hm(time_seg)?;
                epoch_utc(year, month, day, hour, minute, 0)
            }
            None => {
                warn!(
                    "no time field in level II filename '{file_path}'; \
                     this may be an NCDC file"
                );
                None
            }
        }
    } else {
        warn!("unrecognized level II filename '{file_path}'");
        None
    }
}

/// `swp.<yyyMMddhhmmss>.<radar>...`: the second dot-delimited segment holds the
/// whole timestamp, with the year counted from 1900. A segment shorter than 11
/// characters is rejected outright; one shorter than the full 13 lacks a complete
/// `hhmmss` field and is rejected as well rather than degraded to a date-only time.
fn dorade_timestamp(file_path: &str) -> Option<Epoch> {
    let stem = base_name(file_path);
    let seg = *stem.split('.').collect::<Vec<&str>>().get(1)?;
    if seg.is_empty() || seg.len() < 11 {
        return None;
    }

    let year = seg.get(..3)?.parse::<i32>().ok()? + 1900;
    let month = seg.get(3..5)?.parse::<u8>().ok()?;
    let day = seg.get(5..7)?.parse::<u8>().ok()?;
    let (hour, minute, second) = parse_time_hms(seg.get(7..13)?)?;
    epoch_utc(year, month, day, hour, minute, second)
}

/// `<radar>_<yyyyMMdd>_<hhmmss>`, e.g. `KAMX_20161007_044754.nc`.
fn cfradial_timestamp(file_path: &str) -> Option<Epoch> {
    let segments: Vec<&str> = base_name(file_path).split('_').collect();
    if segments.len() < 3 {
        return None;
    }
    let (year, month, day) = parse_date(segments[1])?;
    let (hour, minute, second) = parse_time_hms(segments[2])?;
    epoch_utc(year, month, day, hour, minute, second)
}

#[cfg(test)]
mod scan_time_test {
    use super::*;

    fn window(start: Epoch, end: Epoch) -> TimeWindow {
        TimeWindow::new(start, end)
    }

    #[test]
    fn test_ncdc_timestamp() {
        let t = NamingConvention::NcdcLevel2
            .timestamp("KTLX20130520_200000.nc", "KTLX")
            .unwrap();
        assert_eq!(t, Epoch::from_gregorian_utc(2013, 5, 20, 20, 0, 0, 0));

        let day = window(
            Epoch::from_gregorian_utc(2013, 5, 20, 0, 0, 0, 0),
            Epoch::from_gregorian_utc(2013, 5, 21, 0, 0, 0, 0),
        );
        assert!(NamingConvention::NcdcLevel2.file_in_window(
            "KTLX20130520_200000.nc",
            "KTLX",
            &day
        ));

        let earlier = window(
            Epoch::from_gregorian_utc(2013, 5, 19, 0, 0, 0, 0),
            Epoch::from_gregorian_utc(2013, 5, 20, 0, 0, 0, 0),
        );
        assert!(!NamingConvention::NcdcLevel2.file_in_window(
            "KTLX20130520_200000.nc",
            "KTLX",
            &earlier
        ));
    }

    #[test]
    fn test_cfradial_timestamp() {
        let t = NamingConvention::CfRadial
            .timestamp("KAMX_20161007_044754.nc", "KAMX")
            .unwrap();
        assert_eq!(t, Epoch::from_gregorian_utc(2016, 10, 7, 4, 47, 54, 0));
    }

    #[test]
    fn test_cfradial_requires_three_segments() {
        assert!(NamingConvention::CfRadial
            .timestamp("KAMX_20161007.nc", "KAMX")
            .is_none());
    }

    #[test]
    fn test_dorade_timestamp() {
        let t = NamingConvention::Dorade
            .timestamp("swp.1130520200000.KTLX.900.1.1_SUR_v1", "KTLX")
            .unwrap();
        assert_eq!(t, Epoch::from_gregorian_utc(2013, 5, 20, 20, 0, 0, 0));
    }

    #[test]
    fn test_dorade_short_segment_fails() {
        // Second segment shorter than 11 characters is never accepted.
        assert!(NamingConvention::Dorade
            .timestamp("swp.12345.KTLX.900", "KTLX")
            .is_none());
        assert!(NamingConvention::Dorade
            .timestamp("swp..KTLX.900", "KTLX")
            .is_none());
    }

    #[test]
    fn test_ldm_ucar_format() {
        let t = NamingConvention::LdmLevel2
            .timestamp("Level2_KAMX_20161007_0447.ar2v", "KAMX")
            .unwrap();
        assert_eq!(t, Epoch::from_gregorian_utc(2016, 10, 7, 4, 47, 0, 0));
    }

    #[test]
    fn test_ldm_nrl_format() {
        let t = NamingConvention::LdmLevel2
            .timestamp("KAMX.20161007044754.netcdf", "KAMX")
            .unwrap();
        assert_eq!(t, Epoch::from_gregorian_utc(2016, 10, 7, 4, 47, 54, 0));
    }

    #[test]
    fn test_ldm_purdue_format() {
        let t = NamingConvention::LdmLevel2
            .timestamp("KAMX_20161007_0447", "KAMX")
            .unwrap();
        assert_eq!(t, Epoch::from_gregorian_utc(2016, 10, 7, 4, 47, 0, 0));
    }

    #[test]
    fn test_ldm_missing_time_is_non_fatal() {
        assert!(NamingConvention::LdmLevel2
            .timestamp("KAMX_20161007", "KAMX")
            .is_none());
    }

    #[test]
    fn test_model_passthrough() {
        let any = window(
            Epoch::from_gregorian_utc(2016, 10, 7, 0, 0, 0, 0),
            Epoch::from_gregorian_utc(2016, 10, 8, 0, 0, 0, 0),
        );
        assert!(NamingConvention::Model.timestamp("whatever.bin", "KAMX").is_none());
        assert!(NamingConvention::Model.file_in_window("whatever.bin", "KAMX", &any));
    }

    #[test]
    fn test_failed_extraction_is_out_of_range() {
        let any = window(
            Epoch::from_gregorian_utc(2016, 10, 7, 0, 0, 0, 0),
            Epoch::from_gregorian_utc(2016, 10, 8, 0, 0, 0, 0),
        );
        assert!(!NamingConvention::CfRadial.file_in_window("garbage.nc", "KAMX", &any));
    }

    #[test]
    fn test_factory_tags() {
        assert_eq!(
            "CFRADIAL".parse::<NamingConvention>().unwrap(),
            NamingConvention::CfRadial
        );
        assert_eq!(
            "LDMLEVELII".parse::<NamingConvention>().unwrap(),
            NamingConvention::LdmLevel2
        );
        assert_eq!(
            "GRIB".parse::<NamingConvention>(),
            Err(crate::cyclotrace_errors::CyclotraceError::UnknownNamingConvention(
                "GRIB".to_string()
            ))
        );
    }
}
