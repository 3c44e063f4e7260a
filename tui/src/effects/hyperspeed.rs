//! Hyperspeed
//!
//! A top-down highway at night: warm cars pull away on the left road, cool
//! cars rush closer on the right, with broken lane lines and light sticks
//! scrolling past.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::buffer::Buffer;
use ratatui::style::Color;

use super::BackgroundEffect;
use crate::theme::{fade, COOL, MOSAIC_CYAN, ROAD_WHITE, WARM};

/// Lanes on each side of the island
pub const LANES_PER_ROAD: u16 = 4;

/// Rows per second the road markings scroll
const ROAD_SPEED: f32 = 24.0;

/// Car speed range in rows per second
const CAR_SPEED: (f32, f32) = (12.0, 20.0);

/// Car length range in rows
const CAR_LENGTH: (u16, u16) = (2, 7);

/// Rows between light sticks
const STICK_SPACING: u16 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    /// Moving away (up the screen)
    Left,
    /// Moving closer (down the screen)
    Right,
}

#[derive(Clone, Debug)]
struct Car {
    side: Side,
    lane: u16,
    /// Row of the head
    y: f32,
    speed: f32,
    length: u16,
    color: Color,
}

/// Column layout of the road for a given width
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RoadLayout {
    left_shoulder: u16,
    island: u16,
    right_shoulder: u16,
    lane_width: u16,
}

impl RoadLayout {
    fn for_width(width: u16) -> Self {
        let road = u16::try_from(u32::from(width) * 3 / 5)
            .unwrap_or(u16::MAX)
            .max(LANES_PER_ROAD * 2 + 3);
        let left_shoulder = width.saturating_sub(road) / 2;
        let lane_width = ((road.saturating_sub(3)) / (LANES_PER_ROAD * 2)).max(1);
        let island = left_shoulder + 1 + lane_width * LANES_PER_ROAD;
        let right_shoulder = island + 1 + lane_width * LANES_PER_ROAD;
        Self {
            left_shoulder,
            island,
            right_shoulder,
            lane_width,
        }
    }

    fn lane_x(&self, side: Side, lane: u16) -> u16 {
        let start = match side {
            Side::Left => self.left_shoulder + 1,
            Side::Right => self.island + 1,
        };
        start + lane * self.lane_width + self.lane_width / 2
    }
}

/// The hyperspeed road effect
pub struct Hyperspeed {
    width: u16,
    height: u16,
    layout: RoadLayout,
    cars: Vec<Car>,
    /// Scroll position of the markings, in rows
    offset: f32,
    rng: StdRng,
}

impl Hyperspeed {
    /// Create a road with a random seed
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_rng(width, height, StdRng::from_entropy())
    }

    /// Create a road with a fixed seed
    pub fn seeded(width: u16, height: u16, seed: u64) -> Self {
        Self::with_rng(width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: u16, height: u16, rng: StdRng) -> Self {
        let mut road = Self {
            width: 0,
            height: 0,
            layout: RoadLayout::for_width(width),
            cars: Vec::new(),
            offset: 0.0,
            rng,
        };
        road.resize(width, height);
        road
    }

    fn spawn(&mut self, side: Side, anywhere: bool) -> Car {
        let height = f32::from(self.height);
        let length = self.rng.gen_range(CAR_LENGTH.0..=CAR_LENGTH.1);
        let y = if anywhere {
            self.rng.gen_range(0.0..height.max(1.0))
        } else {
            match side {
                // Enter from the bottom, driving up
                Side::Left => height + f32::from(length),
                // Enter from the top, driving down
                Side::Right => -1.0,
            }
        };
        let palette = match side {
            Side::Left => WARM,
            Side::Right => COOL,
        };
        Car {
            side,
            lane: self.rng.gen_range(0..LANES_PER_ROAD),
            y,
            speed: self.rng.gen_range(CAR_SPEED.0..CAR_SPEED.1),
            length,
            color: palette[self.rng.gen_range(0..palette.len())],
        }
    }

    fn is_off_screen(&self, car: &Car) -> bool {
        let height = f32::from(self.height);
        let length = f32::from(car.length);
        match car.side {
            Side::Left => car.y + length < 0.0,
            Side::Right => car.y - length > height,
        }
    }

    /// Number of cars on the road
    pub fn car_count(&self) -> usize {
        self.cars.len()
    }

    fn put(buf: &mut Buffer, x: u16, y: i32, ch: char, color: Color) {
        let Ok(y) = u16::try_from(y) else {
            return;
        };
        let area = buf.area;
        if x >= area.width || y >= area.height {
            return;
        }
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_char(ch).set_fg(color);
        }
    }
}

impl BackgroundEffect for Hyperspeed {
    fn resize(&mut self, width: u16, height: u16) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.layout = RoadLayout::for_width(width);

        let per_side = usize::from((height / 3).max(4));
        let mut cars = Vec::with_capacity(per_side * 2);
        for side in [Side::Left, Side::Right] {
            for _ in 0..per_side {
                cars.push(self.spawn(side, true));
            }
        }
        self.cars = cars;
    }

    fn update(&mut self, delta: Duration) {
        let dt = delta.as_secs_f32();
        self.offset = (self.offset + ROAD_SPEED * dt) % f32::from(STICK_SPACING * 2);

        for i in 0..self.cars.len() {
            let car = &mut self.cars[i];
            match car.side {
                Side::Left => car.y -= car.speed * dt,
                Side::Right => car.y += car.speed * dt,
            }
            if self.is_off_screen(&self.cars[i]) {
                let side = self.cars[i].side;
                self.cars[i] = self.spawn(side, false);
            }
        }
    }

    fn render(&self, buf: &mut Buffer) {
        let layout = self.layout;
        let shift = self.offset as i32;

        for row in 0..i32::from(self.height) {
            // Shoulders
            Self::put(buf, layout.left_shoulder, row, '│', fade(ROAD_WHITE, 0.6));
            Self::put(buf, layout.right_shoulder, row, '│', fade(ROAD_WHITE, 0.6));
            Self::put(buf, layout.island, row, '┃', fade(ROAD_WHITE, 0.25));

            // Broken lane lines scroll down
            if (row - shift).rem_euclid(4) < 2 {
                for lane in 1..LANES_PER_ROAD {
                    let left = layout.left_shoulder + lane * layout.lane_width;
                    let right = layout.island + lane * layout.lane_width;
                    Self::put(buf, left, row, '╎', fade(ROAD_WHITE, 0.35));
                    Self::put(buf, right, row, '╎', fade(ROAD_WHITE, 0.35));
                }
            }

            // Light sticks beside the right shoulder
            if (row - shift).rem_euclid(i32::from(STICK_SPACING)) == 0 {
                Self::put(buf, layout.right_shoulder + 2, row, '╿', MOSAIC_CYAN);
            }
        }

        for car in &self.cars {
            let x = layout.lane_x(car.side, car.lane);
            let head = car.y.floor() as i32;
            for i in 0..i32::from(car.length) {
                // The tail trails behind the direction of travel and dims.
                let row = match car.side {
                    Side::Left => head + i,
                    Side::Right => head - i,
                };
                let brightness = 1.0 - (i as f32 / f32::from(car.length)) * 0.8;
                let ch = if i == 0 { '█' } else { '┃' };
                Self::put(buf, x, row, ch, fade(car.color, brightness));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    #[test]
    fn test_layout_fits_width() {
        for width in [20u16, 80, 200] {
            let layout = RoadLayout::for_width(width);
            assert!(layout.left_shoulder < layout.island);
            assert!(layout.island < layout.right_shoulder);
            assert!(layout.right_shoulder < width, "width {width}");
            assert!(layout.lane_x(Side::Right, LANES_PER_ROAD - 1) < layout.right_shoulder);
            assert!(layout.lane_x(Side::Left, 0) > layout.left_shoulder);
        }
    }

    #[test]
    fn test_layout_handles_widest_terminal() {
        let layout = RoadLayout::for_width(u16::MAX);
        assert!(layout.right_shoulder < u16::MAX);
        assert!(layout.lane_x(Side::Right, LANES_PER_ROAD - 1) < layout.right_shoulder);
    }

    #[test]
    fn test_cars_stay_in_rotation() {
        let mut road = Hyperspeed::seeded(80, 24, 11);
        let count = road.car_count();
        assert_eq!(count, 16);

        for _ in 0..600 {
            road.update(Duration::from_millis(16));
        }
        assert_eq!(road.car_count(), count);
        assert!(road.cars.iter().all(|c| !road.is_off_screen(c)));
    }

    #[test]
    fn test_left_cars_drive_up() {
        let mut road = Hyperspeed::seeded(80, 24, 2);
        road.cars = vec![Car {
            side: Side::Left,
            lane: 0,
            y: 10.0,
            speed: 10.0,
            length: 3,
            color: WARM[0],
        }];
        road.update(Duration::from_millis(500));
        assert!((road.cars[0].y - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_render_draws_road() {
        let road = Hyperspeed::seeded(80, 24, 4);
        let mut buf = Buffer::empty(Rect::new(0, 0, 80, 24));
        road.render(&mut buf);

        let layout = RoadLayout::for_width(80);
        assert_eq!(buf[(layout.left_shoulder, 0)].symbol(), "│");
        assert_eq!(buf[(layout.right_shoulder, 5)].symbol(), "│");
    }
}
