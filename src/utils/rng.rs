use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Independent random stream of one stochastic wind channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindStream {
    GustSpeed,
    GustHeading,
    GustElevation,
}

impl WindStream {
    fn stream_id(self) -> u64 {
        match self {
            WindStream::GustSpeed => 1,
            WindStream::GustHeading => 2,
            WindStream::GustElevation => 3,
        }
    }
}

/// Seeds every wind channel from one configured seed.
///
/// Each channel reads its own ChaCha stream under the shared key, so the
/// draws of one channel never depend on how many values another consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngManager {
    seed: u64,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn stream(&self, stream: WindStream) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(stream.stream_id());
        rng
    }
}
