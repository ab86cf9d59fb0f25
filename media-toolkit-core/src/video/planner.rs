//! Split planning and compression size estimation.
//!
//! Pure arithmetic over probed metadata; nothing here touches the
//! filesystem or ffmpeg. [`plan_parts`] divides a duration into contiguous
//! segments for a split preview, [`estimate_size`] predicts compression
//! output sizes for a UI preview, and [`target_bitrate_kbps`] budgets the
//! video bitrate for target-size encoding.

use crate::video::presets::{
    resolution_height, DEFAULT_QUALITY_FACTOR, DEFAULT_SIZE_RATIO, QUALITY_SIZE_RATIOS,
    RESOLUTION_QUALITY_FACTORS,
};
use serde::{Deserialize, Serialize};

/// Smallest number of parts a video may be split into.
pub const MIN_PARTS: usize = 2;
/// Largest number of parts a video may be split into.
pub const MAX_PARTS: usize = 20;

/// Lowest video bitrate the target-size budget will go down to, in kbps.
pub const MIN_VIDEO_BITRATE_KBPS: u32 = 500;

/// One contiguous segment of a split plan, 1-indexed, with offsets in both
/// raw seconds and `H:MM:SS` form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartPlan {
    pub part: usize,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub duration_seconds: f64,
    pub start: String,
    pub end: String,
    pub duration: String,
}

/// Clamp a requested part count into `[MIN_PARTS, MAX_PARTS]`.
pub fn clamp_parts(requested: i64) -> usize {
    requested.clamp(MIN_PARTS as i64, MAX_PARTS as i64) as usize
}

/// Format a duration as `H:MM:SS`, or `M:SS` under an hour, truncating
/// fractional seconds.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Divide `duration` into `num_parts` contiguous, non-overlapping segments.
///
/// Segments are equal-length except that the final end is pinned to the
/// total duration, so float overshoot never places a segment past the end.
/// Callers are expected to clamp `num_parts` with [`clamp_parts`] first; a
/// count below 1 is treated as 1.
pub fn plan_parts(duration: f64, num_parts: usize) -> Vec<PartPlan> {
    let num_parts = num_parts.max(1);
    let part_duration = duration / num_parts as f64;

    (0..num_parts)
        .map(|i| {
            let start = i as f64 * part_duration;
            let end = ((i + 1) as f64 * part_duration).min(duration);
            PartPlan {
                part: i + 1,
                start_seconds: start,
                end_seconds: end,
                duration_seconds: end - start,
                start: format_duration(start),
                end: format_duration(end),
                duration: format_duration(end - start),
            }
        })
        .collect()
}

/// Video bitrate needed to land a total output size, in kbps.
///
/// Budgets the full size across the duration, subtracts the audio share and
/// floors at [`MIN_VIDEO_BITRATE_KBPS`] so small targets or long durations
/// never yield a zero or negative bitrate.
pub fn target_bitrate_kbps(target_size_mb: f64, duration_seconds: f64, audio_kbps: u32) -> u32 {
    let total_kbps = (target_size_mb * 1024.0 * 1024.0 * 8.0) / (duration_seconds * 1000.0);
    let video_kbps = total_kbps.floor() as i64 - audio_kbps as i64;
    video_kbps.clamp(MIN_VIDEO_BITRATE_KBPS as i64, u32::MAX as i64) as u32
}

/// Compression parameters as they arrive from a caller, before any
/// validation. Unrecognized combinations degrade to a flat default instead
/// of failing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimateParams {
    pub mode: String,
    pub target_size_mb: Option<f64>,
    pub quality: Option<String>,
    pub resolution: Option<String>,
}

/// Advisory size estimate for a compression preview. Not a guarantee about
/// the actual encoder result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompressionEstimate {
    pub original_size_mb: f64,
    pub estimated_size_mb: f64,
    pub estimated_reduction_percent: f64,
}

/// Estimate the output size of compressing a source of `original_size_mb`
/// megabytes and `width`x`height` pixels under the requested parameters.
///
/// `target_size` passes the target through; `quality` applies a fixed ratio
/// per level; `resolution` scales by pixel count and a quality factor. Any
/// other combination (unknown mode, missing or non-positive target, unknown
/// resolution) falls back to a flat 40% ratio. The estimate is floored at
/// 1 MB and the reduction clamped to `[0, 99]`, so the function never fails,
/// even for zero-size or zero-dimension sources.
pub fn estimate_size(
    params: &EstimateParams,
    original_size_mb: f64,
    width: u32,
    height: u32,
) -> CompressionEstimate {
    let (estimated_size, reduction) = match (params.mode.as_str(), params.target_size_mb) {
        ("target_size", Some(target)) if target > 0.0 => {
            (target, (1.0 - target / original_size_mb) * 100.0)
        }
        ("quality", _) => {
            let ratio = lookup_or(&QUALITY_SIZE_RATIOS, params.quality.as_deref(), DEFAULT_SIZE_RATIO);
            (original_size_mb * ratio, (1.0 - ratio) * 100.0)
        }
        ("resolution", _) if known_resolution(params.resolution.as_deref()) => {
            let pixel_ratio = pixel_ratio(params.resolution.as_deref(), width, height);
            let factor = lookup_or(
                &RESOLUTION_QUALITY_FACTORS,
                params.quality.as_deref(),
                DEFAULT_QUALITY_FACTOR,
            );
            (
                original_size_mb * pixel_ratio * factor,
                (1.0 - pixel_ratio * factor) * 100.0,
            )
        }
        _ => (original_size_mb * DEFAULT_SIZE_RATIO, 60.0),
    };

    // Degenerate 0/0 inputs land on NaN; report them as no reduction.
    let reduction = if reduction.is_nan() { 0.0 } else { reduction };

    CompressionEstimate {
        original_size_mb: round2(original_size_mb),
        estimated_size_mb: round2(estimated_size.max(1.0)),
        estimated_reduction_percent: round1(reduction.clamp(0.0, 99.0)),
    }
}

fn known_resolution(name: Option<&str>) -> bool {
    name.and_then(resolution_height).is_some()
}

/// Pixel-count ratio of the target resolution to the source, preserving
/// aspect ratio. Sources with unknown dimensions count as unchanged.
fn pixel_ratio(resolution: Option<&str>, width: u32, height: u32) -> f64 {
    let Some(target_height) = resolution.and_then(resolution_height) else {
        return 1.0;
    };
    let current_pixels = width as u64 * height as u64;
    if current_pixels == 0 {
        return 1.0;
    }
    let target_width = (width as f64 * (target_height as f64 / height as f64)).trunc();
    (target_width * target_height as f64) / current_pixels as f64
}

fn lookup_or(
    table: &std::collections::HashMap<&'static str, f64>,
    key: Option<&str>,
    default: f64,
) -> f64 {
    key.and_then(|k| table.get(k)).copied().unwrap_or(default)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
