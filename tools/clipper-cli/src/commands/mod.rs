pub mod check;
pub mod decode;
pub mod devices;
pub mod record;

use clipper_platform_sim::{SimPermission, SimulatedPlatform};

use crate::PlatformArgs;

/// Build the simulated platform described on the command line.
pub fn simulated_platform(args: &PlatformArgs) -> SimulatedPlatform {
    let platform = SimulatedPlatform::with_device_counts(args.cameras, args.mics);
    if args.deny {
        platform.set_permission(SimPermission::Denied);
    }
    platform
}
