//! Places a ring of optical units around the equator of a synthetic dome.
//!
//! This demo shows:
//! - Configuring the optical-unit frame
//! - Queuing units in spherical coordinates
//! - Building the world and inspecting the placed volumes
//!
//! Run with: cargo run --example `ring_of_pmts`
//! Optional: pass a JSON options file to build that configuration instead.

use omsim::*;

const UNITS_IN_RING: u32 = 12;
const DOME_RADIUS: f64 = 200.0 * MM;

fn main() -> Result<()> {
    init_logging();

    let construction = match std::env::args().nth(1) {
        Some(path) => construct_from_file(path)?,
        None => {
            let mut construction = Construction::new();
            construction.set_frame_origin(DVec3::new(0.0, 0.0, 10.0 * MM))?;
            construction.set_solid_reflector(true)?;
            construction.set_gel_ring_offset(Some(2.0 * MM))?;
            construction.set_photocathode_tube_length(3.0 * MM)?;
            for i in 0..UNITS_IN_RING {
                let phi = f64::from(i) * 360.0 / f64::from(UNITS_IN_RING) * DEG;
                construction.place(DOME_RADIUS, 70.0 * DEG, phi)?;
            }
            construction.construct()?;
            construction
        }
    };

    let Some(tree) = construction.tree() else {
        return Ok(());
    };
    println!("{}", tree.summary());

    for record in construction.records() {
        let pmt = tree.physical(record.pmt).transform();
        let (axis, angle) = pmt.axis_angle();
        println!(
            "unit {:>2}: PMT at ({:8.2}, {:8.2}, {:8.2}) mm, rotated {:6.2} deg about ({:.3}, {:.3}, {:.3}){}",
            record.copy_no,
            pmt.translation.x,
            pmt.translation.y,
            pmt.translation.z,
            angle / DEG,
            axis.x,
            axis.y,
            axis.z,
            if record.glass_subtracted { ", glass" } else { "" }
        );
    }

    Ok(())
}
