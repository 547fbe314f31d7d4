//! Monitor discovery through `xrandr --listmonitors`
//!
//! Output looks like:
//!
//! ```text
//! Monitors: 2
//!  0: +*eDP-1 1920/344x1080/193+0+0  eDP-1
//!  1: +HDMI-1 2560/597x1440/336+1920+0  HDMI-1
//! ```

use anyhow::{Context, Result, anyhow, bail};
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

use super::{Display, DisplaySource};
use crate::constants::xrandr;

/// Lists monitors by running a listing tool and parsing its output
pub struct XrandrDisplays {
    program: &'static str,
    args: &'static [&'static str],
    timeout: Duration,
}

impl Default for XrandrDisplays {
    fn default() -> Self {
        Self {
            program: xrandr::PROGRAM,
            args: xrandr::ARGS,
            timeout: Duration::from_millis(xrandr::TIMEOUT_MS),
        }
    }
}

impl DisplaySource for XrandrDisplays {
    fn name(&self) -> &'static str {
        "xrandr"
    }

    fn query(&self) -> Vec<Display> {
        match run_listing(self.program, self.args, self.timeout) {
            Ok(output) => parse_monitors(&output),
            Err(e) => {
                debug!(error = ?e, "xrandr monitor listing unavailable");
                Vec::new()
            }
        }
    }
}

/// Run `program` and collect its stdout, killing it if it outlives `timeout`
fn run_listing(program: &str, args: &[&str], timeout: Duration) -> Result<String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to spawn {program}"))?;

    // Drained while waiting so a full pipe cannot stall the child
    let mut stdout = child
        .stdout
        .take()
        .with_context(|| format!("{program} stdout was not captured"))?;
    let reader = thread::spawn(move || {
        let mut output = String::new();
        stdout.read_to_string(&mut output).map(|_| output)
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child
            .try_wait()
            .with_context(|| format!("Failed to poll {program} exit status"))?
        {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            bail!("{program} did not exit within {}ms", timeout.as_millis());
        }
        thread::sleep(Duration::from_millis(xrandr::POLL_INTERVAL_MS));
    };

    if !status.success() {
        bail!("{program} exited with {status}");
    }

    reader
        .join()
        .map_err(|_| anyhow!("{program} output reader panicked"))?
        .with_context(|| format!("Failed to read {program} output"))
}

/// Parse every monitor line, skipping anything that does not fit the shape
pub fn parse_monitors(output: &str) -> Vec<Display> {
    output
        .lines()
        .filter_map(|line| {
            let display = parse_monitor_line(line);
            if display.is_none() && !line.trim().is_empty() {
                debug!(line, "Skipping non-monitor xrandr line");
            }
            display
        })
        .collect()
}

/// Parse one `INDEX: +FLAGS WxH+X+Y NAME` line
pub fn parse_monitor_line(line: &str) -> Option<Display> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < xrandr::MIN_FIELDS || !fields[1].starts_with(xrandr::ACTIVE_FLAG) {
        return None;
    }

    let (width, height, x, y) = parse_geometry(fields[2])?;
    let name = fields[fields.len() - 1];
    Some(Display::new(width, height, x, y, name))
}

/// Parse `WIDTHxHEIGHT+X+Y`, tolerating the `/mm` physical-size suffixes xrandr
/// prints after each dimension
fn parse_geometry(geometry: &str) -> Option<(u32, u32, i32, i32)> {
    let offsets_at = geometry.find(['+', '-'])?;
    let (size, offsets) = geometry.split_at(offsets_at);

    let (width, height) = size.split_once('x')?;
    let width = strip_physical(width).parse().ok()?;
    let height = strip_physical(height).parse().ok()?;

    let (x, rest) = parse_offset(offsets)?;
    let (y, rest) = parse_offset(rest)?;
    if !rest.is_empty() {
        return None;
    }
    Some((width, height, x, y))
}

fn strip_physical(dimension: &str) -> &str {
    dimension.split('/').next().unwrap_or(dimension)
}

/// Take one `+N`, `-N`, `+-N` or `++N` offset off the front of `s`
fn parse_offset(s: &str) -> Option<(i32, &str)> {
    let mut chars = s.chars();
    let separator = chars.next().filter(|c| matches!(c, '+' | '-'))?;
    let mut rest = chars.as_str();

    let negative = match rest.chars().next() {
        Some(sign @ ('+' | '-')) => {
            rest = &rest[1..];
            sign == '-'
        }
        _ => separator == '-',
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let magnitude: i32 = rest[..digits_end].parse().ok()?;
    let value = if negative { -magnitude } else { magnitude };
    Some((value, &rest[digits_end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_geometry_line() {
        let display = parse_monitor_line("0: +*eDP-1 1920x1080+0+0 eDP-1");
        assert_eq!(display, Some(Display::new(1920, 1080, 0, 0, "eDP-1")));
    }

    #[test]
    fn test_parse_physical_size_suffixes() {
        let display = parse_monitor_line(" 1: +HDMI-1 2560/597x1440/336+1920+0  HDMI-1");
        assert_eq!(display, Some(Display::new(2560, 1440, 1920, 0, "HDMI-1")));
    }

    #[test]
    fn test_parse_negative_offsets() {
        assert_eq!(
            parse_monitor_line("2: +DP-2 1280x1024-1280+0 DP-2"),
            Some(Display::new(1280, 1024, -1280, 0, "DP-2"))
        );
        assert_eq!(
            parse_monitor_line("2: +DP-2 1280x1024+-1280+-300 DP-2"),
            Some(Display::new(1280, 1024, -1280, -300, "DP-2"))
        );
    }

    #[test]
    fn test_name_is_last_field() {
        let display = parse_monitor_line("0: +*eDP-1 1920x1080+0+0 extra eDP-1-name").unwrap();
        assert_eq!(display.name, "eDP-1-name");
    }

    #[test]
    fn test_skip_short_and_inactive_lines() {
        assert_eq!(parse_monitor_line("Monitors: 2"), None);
        assert_eq!(parse_monitor_line("0: *eDP-1 1920x1080+0+0 eDP-1"), None);
        assert_eq!(parse_monitor_line("0: +eDP-1 1920x1080+0+0"), None);
        assert_eq!(parse_monitor_line(""), None);
    }

    #[test]
    fn test_skip_unparseable_geometry() {
        assert_eq!(parse_monitor_line("0: +eDP-1 garbage eDP-1"), None);
        assert_eq!(parse_monitor_line("0: +eDP-1 1920x1080 eDP-1"), None);
        assert_eq!(parse_monitor_line("0: +eDP-1 1920x1080+0 eDP-1"), None);
        assert_eq!(parse_monitor_line("0: +eDP-1 axb+0+0 eDP-1"), None);
    }

    #[test]
    fn test_malformed_line_does_not_stop_parsing() {
        let output = "Monitors: 3\n \
                      0: +*eDP-1 1920/344x1080/193+0+0  eDP-1\n \
                      1: +HDMI-1 broken HDMI-1\n \
                      2: +DP-1 3840x2160+1920+0  DP-1\n";
        let displays = parse_monitors(output);
        assert_eq!(
            displays,
            vec![
                Display::new(1920, 1080, 0, 0, "eDP-1"),
                Display::new(3840, 2160, 1920, 0, "DP-1"),
            ]
        );
    }

    #[test]
    fn test_area_matches_geometry() {
        let display = parse_monitor_line("0: +*X 1366x768+10+20 X").unwrap();
        assert_eq!(display.width * display.height, 1366 * 768);
        assert_eq!((display.x, display.y), (10, 20));
    }

    #[cfg(unix)]
    fn source(program: &'static str, args: &'static [&'static str], timeout_ms: u64) -> XrandrDisplays {
        XrandrDisplays {
            program,
            args,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_tool_yields_no_displays() {
        let timeout = Duration::from_millis(xrandr::TIMEOUT_MS);
        assert!(run_listing("overlay-clock-no-such-tool", &[], timeout).is_err());
        assert!(source("overlay-clock-no-such-tool", &[], 2000).query().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_an_error() {
        let result = run_listing("sh", &["-c", "exit 3"], Duration::from_secs(2));
        assert!(result.is_err());
        assert!(source("sh", &["-c", "exit 3"], 2000).query().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_tool_is_killed_at_deadline() {
        let started = Instant::now();
        let result = run_listing("sleep", &["5"], Duration::from_millis(50));
        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[cfg(unix)]
    #[test]
    fn test_output_larger_than_pipe_buffer_is_read() {
        let output = run_listing(
            "sh",
            &["-c", "yes ' 0: +*eDP-1 1920x1080+0+0  eDP-1' | head -n 20000"],
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(output.lines().count(), 20000);
        assert_eq!(parse_monitors(&output).len(), 20000);
    }

    #[cfg(unix)]
    #[test]
    fn test_listing_output_is_parsed() {
        let displays = source(
            "sh",
            &["-c", "printf 'Monitors: 1\\n 0: +*eDP-1 1920/344x1080/193+0+0  eDP-1\\n'"],
            2000,
        )
        .query();
        assert_eq!(displays, vec![Display::new(1920, 1080, 0, 0, "eDP-1")]);
    }
}
