use rand::seq::SliceRandom;
use rand::Rng;

const SYMBOLS: [char; 6] = ['✦', '✧', '★', '•', '◆', '✓'];
const BURST_SIZE: usize = 40;
/// How many countdown ticks the burst stays on screen.
pub const CELEBRATION_TICKS: u32 = 4;
const GRAVITY: f64 = 0.12;

/// One piece of confetti. Positions are fractions of the drawing area so the
/// burst is independent of terminal size.
#[derive(Debug, Clone)]
pub struct Confetti {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
}

impl Confetti {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: rng.gen_range(0.2..0.8),
            y: rng.gen_range(0.3..0.6),
            vel_x: rng.gen_range(-0.15..0.15),
            vel_y: rng.gen_range(-0.25..-0.05),
            symbol: *SYMBOLS.choose(rng).unwrap_or(&'✦'),
            color_index: rng.gen_range(0..7),
        }
    }

    fn advance(&mut self) {
        self.x += self.vel_x;
        self.y += self.vel_y;
        self.vel_y += GRAVITY;
    }

    pub fn on_screen(&self) -> bool {
        (0.0..1.0).contains(&self.x) && (0.0..1.0).contains(&self.y)
    }
}

/// Confetti burst shown over the results of a perfect round
#[derive(Debug, Default)]
pub struct Celebration {
    pub particles: Vec<Confetti>,
    ticks_left: u32,
}

impl Celebration {
    pub fn start(&mut self) {
        self.start_with(&mut rand::thread_rng());
    }

    pub fn start_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.particles = (0..BURST_SIZE).map(|_| Confetti::random(rng)).collect();
        self.ticks_left = CELEBRATION_TICKS;
    }

    pub fn stop(&mut self) {
        self.particles.clear();
        self.ticks_left = 0;
    }

    pub fn is_active(&self) -> bool {
        self.ticks_left > 0
    }

    /// Moves every particle one step and drops the ones that left the area.
    pub fn advance(&mut self) {
        if !self.is_active() {
            return;
        }
        self.ticks_left -= 1;
        if self.ticks_left == 0 {
            self.particles.clear();
            return;
        }

        self.particles.iter_mut().for_each(Confetti::advance);
        self.particles.retain(Confetti::on_screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn starts_inactive() {
        let c = Celebration::default();
        assert!(!c.is_active());
        assert!(c.particles.is_empty());
    }

    #[test]
    fn burst_lasts_a_fixed_number_of_ticks() {
        let mut c = Celebration::default();
        c.start_with(&mut StdRng::seed_from_u64(3));
        assert_eq!(c.particles.len(), BURST_SIZE);
        assert!(c.particles.iter().all(Confetti::on_screen));

        for _ in 0..CELEBRATION_TICKS - 1 {
            c.advance();
            assert!(c.is_active());
        }
        c.advance();
        assert!(!c.is_active());
        assert!(c.particles.is_empty());
    }

    #[test]
    fn particles_fall_under_gravity() {
        let mut p = Confetti {
            x: 0.5,
            y: 0.5,
            vel_x: 0.0,
            vel_y: -0.1,
            symbol: '★',
            color_index: 0,
        };
        p.advance();
        assert!((p.y - 0.4).abs() < 1e-9);
        assert!(p.vel_y > 0.0);
    }

    #[test]
    fn off_screen_particles_are_dropped() {
        let mut c = Celebration::default();
        c.start_with(&mut StdRng::seed_from_u64(9));
        c.particles.push(Confetti {
            x: 0.5,
            y: 0.95,
            vel_x: 0.0,
            vel_y: 0.5,
            symbol: '•',
            color_index: 1,
        });
        c.advance();
        assert!(c.particles.iter().all(Confetti::on_screen));
        assert!(c.particles.len() <= BURST_SIZE);
    }

    #[test]
    fn stop_clears_the_burst() {
        let mut c = Celebration::default();
        c.start();
        c.stop();
        assert!(!c.is_active());
        assert!(c.particles.is_empty());
    }
}
