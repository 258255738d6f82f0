//! Platform and device discovery.

use std::fmt;

/// Capabilities printed for every device of the selected platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReport {
    pub name: String,
    pub compute_units: u32,
    pub local_mem_bytes: u64,
    pub max_work_group_size: usize,
}

impl fmt::Display for DeviceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} compute units, {} bytes local memory, work-group <= {})",
            self.name, self.compute_units, self.local_mem_bytes, self.max_work_group_size
        )
    }
}

#[cfg(feature = "opencl")]
pub use self::opencl::{list_devices, TargetDevice};

#[cfg(feature = "opencl")]
mod opencl {
    use ocl::enums::{DeviceInfo, DeviceInfoResult};
    use ocl::{Device, Platform};
    use tracing::{debug, info};

    use super::DeviceReport;
    use crate::error::{BenchError, Result};

    fn query<E: std::fmt::Display>(what: &'static str) -> impl FnOnce(E) -> BenchError {
        move |e| BenchError::Query {
            what,
            message: e.to_string(),
        }
    }

    fn unexpected(what: &'static str, answer: DeviceInfoResult) -> BenchError {
        query(what)(format!("unexpected answer {answer:?}"))
    }

    fn platform(index: usize) -> Result<Platform> {
        // Platform::list panics when no ICD loader is installed.
        let platforms = std::panic::catch_unwind(Platform::list)
            .map_err(|_| BenchError::NoPlatform)?;
        if platforms.is_empty() {
            return Err(BenchError::NoPlatform);
        }
        let available = platforms.len();
        platforms
            .into_iter()
            .nth(index)
            .ok_or(BenchError::PlatformIndex { index, available })
    }

    fn devices(platform: &Platform) -> Result<Vec<Device>> {
        let devices = Device::list_all(platform)
            .map_err(query("platform devices"))?;
        if devices.is_empty() {
            return Err(BenchError::NoDevice {
                platform: platform.name().unwrap_or_else(|_| "<unnamed>".into()),
            });
        }
        Ok(devices)
    }

    fn describe(device: &Device) -> Result<DeviceReport> {
        let name = device.name().map_err(query("device name"))?;
        let units = device.info(DeviceInfo::MaxComputeUnits);
        let compute_units = match units.map_err(query("compute units"))? {
            DeviceInfoResult::MaxComputeUnits(units) => units,
            other => return Err(unexpected("compute units", other)),
        };
        let local_mem = device.info(DeviceInfo::LocalMemSize);
        let local_mem_bytes = match local_mem.map_err(query("local memory size"))? {
            DeviceInfoResult::LocalMemSize(bytes) => bytes,
            other => return Err(unexpected("local memory size", other)),
        };
        let max_work_group_size = device.max_wg_size().map_err(query("max work-group size"))?;

        Ok(DeviceReport {
            name,
            compute_units,
            local_mem_bytes,
            max_work_group_size,
        })
    }

    /// Describes every device of the platform at `platform_index`.
    pub fn list_devices(platform_index: usize) -> Result<Vec<DeviceReport>> {
        let platform = platform(platform_index)?;
        devices(&platform)?.iter().map(describe).collect()
    }

    /// The device all work is dispatched to.
    #[derive(Debug, Clone)]
    pub struct TargetDevice {
        pub(crate) platform: Platform,
        pub(crate) device: Device,
        pub report: DeviceReport,
    }

    impl TargetDevice {
        pub fn resolve(platform_index: usize, device_index: usize) -> Result<Self> {
            let platform = platform(platform_index)?;
            let devices = devices(&platform)?;
            let available = devices.len();
            let Some(&device) = devices.get(device_index) else {
                return Err(BenchError::DeviceIndex {
                    index: device_index,
                    available,
                });
            };
            let report = describe(&device)?;

            debug!(
                platform = platform_index,
                device = device_index,
                "resolved target device"
            );
            info!("Selected device: {}", report);
            Ok(Self {
                platform,
                device,
                report,
            })
        }

        pub fn name(&self) -> &str {
            &self.report.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(feature = "opencl")]
    use crate::error::BenchError;

    #[test]
    fn report_display() {
        let report = DeviceReport {
            name: "Test GPU".into(),
            compute_units: 24,
            local_mem_bytes: 65536,
            max_work_group_size: 1024,
        };
        assert_eq!(
            report.to_string(),
            "Test GPU (24 compute units, 65536 bytes local memory, work-group <= 1024)"
        );
    }

    #[cfg(feature = "opencl")]
    #[test]
    fn resolve_is_graceful_without_hardware() {
        match TargetDevice::resolve(0, 0) {
            Ok(target) => assert!(!target.name().is_empty()),
            Err(e) => assert!(e.is_environment(), "unexpected error: {e}"),
        }
    }

    #[cfg(feature = "opencl")]
    #[test]
    fn out_of_range_device_index() {
        if let Ok(devices) = list_devices(0) {
            let err = TargetDevice::resolve(0, devices.len()).unwrap_err();
            assert!(matches!(err, BenchError::DeviceIndex { .. }), "{err}");
        }
    }
}
