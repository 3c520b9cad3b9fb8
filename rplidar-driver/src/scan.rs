use crate::constants::SAMPLES_PER_FRAME;
use crate::numeric::{angle_offset_q3, calc_distance, degree_to_radian, q6_to_degree};
use rplidar_data::{ExpressScanFrame, Measurement, Scan};

const FULL_TURN_Q6: i32 = 360 << 6;
const FULL_TURN_Q8: i32 = 360 << 8;
const FULL_TURN_Q16: i32 = 360 << 16;

pub(crate) trait RplidarScan {
    fn new() -> Scan;
    fn push_measurement(&mut self, m: &Measurement);
    fn len(&self) -> usize;
}

impl RplidarScan for Scan {
    fn new() -> Scan {
        Scan {
            angles_radian: Vec::new(),
            distances: Vec::new(),
        }
    }

    fn push_measurement(&mut self, m: &Measurement) {
        self.angles_radian.push(degree_to_radian(m.angle_degrees));
        self.distances.push(m.distance_mm);
    }

    fn len(&self) -> usize {
        self.distances.len()
    }
}

/// Samples of `frame`, spread between its start angle and the start angle of
/// the frame that followed it.
pub(crate) fn frame_measurements(
    frame: &ExpressScanFrame,
    next_start_angle_q6: u16,
) -> Vec<Measurement> {
    let start_q8 = (frame.start_angle_q6 as i32) << 2;
    let next_q8 = (next_start_angle_q6 as i32) << 2;
    let mut diff_q8 = next_q8 - start_q8;
    if start_q8 > next_q8 {
        diff_q8 += FULL_TURN_Q8;
    }
    // Q8 -> Q16 is << 8, spread over 32 samples is >> 5
    let angle_inc_q16 = (diff_q8 << 8) / SAMPLES_PER_FRAME;
    let mut angle_q16 = start_q8 << 8;

    let mut measurements = Vec::with_capacity(SAMPLES_PER_FRAME as usize);
    for cabin in frame.cabins.iter() {
        let samples = [
            (cabin.distance_angle_1, cabin.offset_angles_q3),
            (cabin.distance_angle_2, cabin.offset_angles_q3 >> 4),
        ];
        for (distance_angle, nibble) in samples {
            let offset_q3 = angle_offset_q3(nibble, distance_angle);
            // Q3 -> Q16 is << 13, Q16 -> Q6 is >> 10
            let mut angle_q6 = (angle_q16 - (offset_q3 << 13)) >> 10;
            if angle_q6 < 0 {
                angle_q6 += FULL_TURN_Q6;
            }
            if angle_q6 >= FULL_TURN_Q6 {
                angle_q6 -= FULL_TURN_Q6;
            }
            let new_scan = angle_inc_q16 > 0 && angle_q16 % FULL_TURN_Q16 < angle_inc_q16;
            measurements.push(Measurement {
                angle_degrees: q6_to_degree(angle_q6),
                distance_mm: calc_distance(distance_angle),
                new_scan,
            });
            angle_q16 += angle_inc_q16;
        }
    }
    measurements
}

/// Turns consecutive frames into one-revolution scans.
pub(crate) struct ScanAssembler {
    previous: Option<ExpressScanFrame>,
    scan: Scan,
}

impl ScanAssembler {
    pub(crate) fn new() -> ScanAssembler {
        ScanAssembler {
            previous: None,
            scan: <Scan as RplidarScan>::new(),
        }
    }

    /// Feeds the next accepted frame and returns the scan it completed, if any.
    ///
    /// The samples of a frame can only be placed once the following frame's
    /// start angle is known, so each call emits the samples of the previous
    /// frame.
    pub(crate) fn push_frame(&mut self, frame: &ExpressScanFrame) -> Option<Scan> {
        // The first frame after a mode switch has nothing to pair with
        if frame.start_flag {
            self.previous = Some(frame.clone());
            self.scan = <Scan as RplidarScan>::new();
            return None;
        }
        let previous = match self.previous.replace(frame.clone()) {
            Some(p) => p,
            None => return None,
        };

        let mut completed = None;
        for m in frame_measurements(&previous, frame.start_angle_q6) {
            if m.new_scan && self.scan.len() > 0 {
                completed = Some(std::mem::replace(
                    &mut self.scan,
                    <Scan as RplidarScan>::new(),
                ));
            }
            if m.distance_mm == 0 {
                continue;
            }
            self.scan.push_measurement(&m);
        }
        completed
    }
}
