use std::cmp::Ordering;
use std::env;
use std::process::Command;

const MAX_BITS_OVERRIDE: &str = "LANELY_MAX_VECTOR_BITS";

// CPU features that select the preferred vector width
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    cfg_flag: &'static str,
    vector_bits: usize,
    detected: bool,
}

impl CpuFeature {
    // Lowest number == Highest Priority
    fn priority(&self) -> usize {
        match self.name {
            "avx512f" => 0,
            "avx2" => 1,
            "sse4_1" => 2,
            "neon" => 3,
            _ => usize::MAX,
        }
    }

    fn features() -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "sse4_1",
                cfg_flag: "sse",
                vector_bits: 128,
                detected: false,
            },
            CpuFeature {
                name: "avx512f",
                cfg_flag: "avx512",
                vector_bits: 512,
                detected: false,
            },
            CpuFeature {
                name: "avx2",
                cfg_flag: "avx2",
                vector_bits: 256,
                detected: false,
            },
            CpuFeature {
                name: "neon",
                cfg_flag: "neon",
                vector_bits: 128,
                detected: false,
            },
        ]
    }
}

impl Ord for CpuFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for CpuFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

trait CpuFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]);
    fn is_applicable(&self) -> bool;
}

struct LinuxDetector;
impl CpuFeatureDetector for LinuxDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
            let contents = cpuinfo.to_lowercase();
            for feature in features.iter_mut() {
                // aarch64 kernels report NEON as "asimd"
                feature.detected = contents.contains(feature.name)
                    || (feature.name == "neon" && contents.contains("asimd"));
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "linux")
    }
}

struct MacOSDetector;
impl CpuFeatureDetector for MacOSDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let output = Command::new("sysctl").args(["-a"]).output();

        if let Ok(output) = output {
            let contents = String::from_utf8_lossy(&output.stdout).to_lowercase();

            for feature in features.iter_mut() {
                match feature.name {
                    "avx512f" => feature.detected = contents.contains("hw.optional.avx512f: 1"),
                    "avx2" => feature.detected = contents.contains("hw.optional.avx2_0: 1"),
                    "sse4_1" => feature.detected = contents.contains("hw.optional.sse4_1: 1"),
                    "neon" => feature.detected = contents.contains("hw.optional.neon: 1"),
                    _ => {}
                }
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "macos")
    }
}

// TODO: Windows detector (falls back to 128-bit vectors for now)

struct PlatformDetector;
impl PlatformDetector {
    fn cpu_features_detectors() -> Vec<Box<dyn CpuFeatureDetector>> {
        vec![Box::new(LinuxDetector), Box::new(MacOSDetector)]
    }

    fn detect_cpu_features(features: &mut [CpuFeature]) {
        for detector in Self::cpu_features_detectors() {
            if detector.is_applicable() {
                detector.detect_features(features);
                break;
            }
        }
    }

    /// Width forced through the environment, if it names a supported width.
    fn width_override() -> Option<usize> {
        let value = env::var(MAX_BITS_OVERRIDE).ok()?;
        match value.trim().parse::<usize>() {
            Ok(bits @ (128 | 256 | 512)) => Some(bits),
            _ => {
                println!("cargo:warning={MAX_BITS_OVERRIDE}={value} ignored (expected 128, 256 or 512)");
                None
            }
        }
    }

    fn apply(features: &mut [CpuFeature], width_override: Option<usize>) {
        features.sort();

        let cfg_flag = match width_override {
            Some(bits) => features
                .iter()
                .find(|cpu_feature| cpu_feature.vector_bits == bits)
                .map(|cpu_feature| cpu_feature.cfg_flag),
            None => features
                .iter()
                .find(|cpu_feature| cpu_feature.detected)
                .map(|cpu_feature| cpu_feature.cfg_flag),
        }
        .unwrap_or("fallback");

        println!("cargo:rustc-cfg={cfg_flag}");

        println!("cargo::rustc-check-cfg=cfg(avx512)");
        println!("cargo::rustc-check-cfg=cfg(avx2)");
        println!("cargo::rustc-check-cfg=cfg(sse)");
        println!("cargo::rustc-check-cfg=cfg(neon)");
        println!("cargo::rustc-check-cfg=cfg(fallback)");
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed={MAX_BITS_OVERRIDE}");

    let mut features = CpuFeature::features();

    let host = env::var("HOST").unwrap_or_default();
    let target = env::var("TARGET").unwrap_or_default();

    // Only run CPU detection for native builds
    if host == target {
        PlatformDetector::detect_cpu_features(&mut features);
    }

    PlatformDetector::apply(&mut features, PlatformDetector::width_override());
}
