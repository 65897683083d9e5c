//! Host detection and per-user directories.

pub mod paths;

use std::env::consts::{ARCH, OS};

use crate::consts::UNKNOWN;

/// `<arch>-<os>` for the running host, e.g. `aarch64-darwin`.
///
/// Either part is `"unknown"` when it could not be detected.
pub fn platform_triple() -> String {
  format!("{}-{}", arch_name(), os_name())
}

/// Lowercase OS identifier; macOS is reported as `darwin`.
pub fn os_name() -> &'static str {
  match OS {
    "macos" => "darwin",
    "linux" | "windows" | "freebsd" => OS,
    _ => UNKNOWN,
  }
}

pub fn arch_name() -> &'static str {
  match ARCH {
    "x86" | "x86_64" | "arm" | "aarch64" | "riscv64" => ARCH,
    _ => UNKNOWN,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn triple_joins_detected_parts() {
    assert_eq!(platform_triple(), format!("{}-{}", arch_name(), os_name()));
  }

  #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
  #[test]
  fn linux_x86_64_is_detected() {
    assert_eq!(platform_triple(), "x86_64-linux");
  }

  #[cfg(target_os = "macos")]
  #[test]
  fn macos_is_darwin() {
    assert_eq!(os_name(), "darwin");
  }
}
