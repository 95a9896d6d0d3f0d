// ── Detail controller ──
//
// Same sans-IO shape as the listing: `open` hands back a sequenced request
// and `complete` accepts only the newest one.

use pokedex_api::PokemonDetail;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::source::CatalogSource;

pub const INVALID_ID_ERROR: &str = "Invalid Pokemon ID";
pub const DETAIL_ERROR: &str = "Failed to load Pokemon details. Please try again later.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetailPhase {
    #[default]
    Idle,
    Loading {
        pokedex_id: u32,
    },
    Loaded(Box<PokemonDetail>),
    Error(String),
}

/// Outcome of feeding a detail response back into the controller.
#[derive(Debug)]
pub enum DetailCompletion {
    Loaded,
    Failed(CoreError),
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailRequest {
    pub seq: u64,
    pub pokedex_id: u32,
}

/// Parse a user-supplied pokedex id. Zero and non-numbers are rejected.
pub fn parse_pokedex_id(raw: &str) -> Option<u32> {
    raw.trim().parse().ok().filter(|id| *id > 0)
}

#[derive(Debug, Clone, Default)]
pub struct DetailController {
    phase: DetailPhase,
    seq: u64,
    /// Last valid id handed to `open`, kept through failures for `retry`.
    pokedex_id: Option<u32>,
}

impl DetailController {
    pub fn phase(&self) -> &DetailPhase {
        &self.phase
    }

    pub fn detail(&self) -> Option<&PokemonDetail> {
        match &self.phase {
            DetailPhase::Loaded(detail) => Some(&**detail),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            DetailPhase::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, DetailPhase::Loading { .. })
    }

    /// Start loading `pokedex_id`. Returns `None` (and records the error)
    /// when the id is not a valid catalog id.
    pub fn open(&mut self, pokedex_id: u32) -> Option<DetailRequest> {
        // Any outstanding response is now stale.
        self.seq += 1;
        if pokedex_id == 0 {
            self.pokedex_id = None;
            self.phase = DetailPhase::Error(INVALID_ID_ERROR.into());
            return None;
        }
        self.pokedex_id = Some(pokedex_id);
        debug!(seq = self.seq, pokedex_id, "issuing detail request");
        self.phase = DetailPhase::Loading { pokedex_id };
        Some(DetailRequest {
            seq: self.seq,
            pokedex_id,
        })
    }

    /// Like [`open`](Self::open), from raw user input.
    pub fn open_raw(&mut self, raw: &str) -> Option<DetailRequest> {
        self.open(parse_pokedex_id(raw).unwrap_or(0))
    }

    /// Return to the empty state, dropping any outstanding request.
    pub fn close(&mut self) {
        self.seq += 1;
        self.pokedex_id = None;
        self.phase = DetailPhase::Idle;
    }

    /// The entry being shown, loaded, or that failed to load.
    pub fn pokedex_id(&self) -> Option<u32> {
        self.pokedex_id
    }

    /// Request the current entry again, whatever its phase.
    pub fn retry(&mut self) -> Option<DetailRequest> {
        self.pokedex_id.and_then(|id| self.open(id))
    }

    /// Feed the outcome of `request` back in.
    pub fn complete(
        &mut self,
        request: DetailRequest,
        result: Result<PokemonDetail, CoreError>,
    ) -> DetailCompletion {
        if request.seq != self.seq {
            debug!(seq = request.seq, latest = self.seq, "discarding stale detail response");
            return DetailCompletion::Stale;
        }
        match result {
            Ok(detail) => {
                self.phase = DetailPhase::Loaded(Box::new(detail));
                DetailCompletion::Loaded
            }
            Err(err) => {
                warn!(error = %err, pokedex_id = request.pokedex_id, "detail fetch failed");
                self.phase = DetailPhase::Error(DETAIL_ERROR.into());
                DetailCompletion::Failed(err)
            }
        }
    }
}

/// Fetch one detail record inline. Used by callers without a task pool.
pub async fn load_detail<S: CatalogSource>(
    source: &S,
    controller: &mut DetailController,
    pokedex_id: u32,
) -> Result<(), CoreError> {
    let Some(request) = controller.open(pokedex_id) else {
        return Err(CoreError::Validation {
            message: INVALID_ID_ERROR.into(),
        });
    };
    let result = source.pokemon_detail(pokedex_id).await;
    match controller.complete(request, result) {
        DetailCompletion::Failed(err) => Err(err),
        DetailCompletion::Loaded | DetailCompletion::Stale => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pokedex_api::Pokemon;
    use pretty_assertions::assert_eq;

    use super::*;

    fn detail(id: u32) -> PokemonDetail {
        PokemonDetail {
            pokemon: Pokemon {
                id,
                name: format!("p{id}"),
                image: String::new(),
                pokedex_id: id,
                types: Vec::new(),
                sprite: None,
                generation: None,
            },
            height: 7,
            weight: 69,
            abilities: Vec::new(),
            stats: Vec::new(),
            evolutions: Vec::new(),
        }
    }

    #[test]
    fn zero_id_is_invalid() {
        let mut controller = DetailController::default();
        assert!(controller.open(0).is_none());
        assert_eq!(controller.error(), Some(INVALID_ID_ERROR));
    }

    #[test]
    fn raw_ids_are_parsed() {
        assert_eq!(parse_pokedex_id(" 25 "), Some(25));
        assert_eq!(parse_pokedex_id("0"), None);
        assert_eq!(parse_pokedex_id("pikachu"), None);
        assert_eq!(parse_pokedex_id("-3"), None);

        let mut controller = DetailController::default();
        assert!(controller.open_raw("abc").is_none());
        assert_eq!(controller.error(), Some(INVALID_ID_ERROR));
    }

    #[test]
    fn loaded_detail_is_exposed() {
        let mut controller = DetailController::default();
        let request = controller.open(1).unwrap();
        assert!(controller.is_loading());

        assert!(matches!(
            controller.complete(request, Ok(detail(1))),
            DetailCompletion::Loaded
        ));
        assert_eq!(controller.detail().unwrap().pokemon.pokedex_id, 1);
    }

    #[test]
    fn failure_sets_message() {
        let mut controller = DetailController::default();
        let request = controller.open(4).unwrap();
        controller.complete(request, Err(CoreError::Timeout));
        assert_eq!(controller.error(), Some(DETAIL_ERROR));
        assert!(controller.detail().is_none());
    }

    #[test]
    fn failed_load_can_be_retried() {
        let mut controller = DetailController::default();
        let first = controller.open(4).unwrap();
        controller.complete(first, Err(CoreError::Timeout));

        let retry = controller.retry().unwrap();
        assert_eq!(retry.pokedex_id, 4);
        assert!(retry.seq > first.seq);
        assert!(controller.is_loading());

        assert!(matches!(
            controller.complete(retry, Ok(detail(4))),
            DetailCompletion::Loaded
        ));
    }

    #[test]
    fn nothing_to_retry_after_close_or_invalid_id() {
        let mut controller = DetailController::default();
        assert!(controller.retry().is_none());

        controller.open(4).unwrap();
        controller.close();
        assert!(controller.retry().is_none());

        controller.open(0);
        assert!(controller.retry().is_none());
        assert_eq!(controller.error(), Some(INVALID_ID_ERROR));
    }

    #[test]
    fn navigating_away_discards_the_old_response() {
        let mut controller = DetailController::default();
        let first = controller.open(1).unwrap();
        let second = controller.open(2).unwrap();

        assert!(matches!(
            controller.complete(second, Ok(detail(2))),
            DetailCompletion::Loaded
        ));
        assert!(matches!(
            controller.complete(first, Ok(detail(1))),
            DetailCompletion::Stale
        ));
        assert_eq!(controller.detail().unwrap().pokemon.pokedex_id, 2);
    }

    #[test]
    fn close_drops_outstanding_request() {
        let mut controller = DetailController::default();
        let request = controller.open(1).unwrap();
        controller.close();
        assert!(matches!(
            controller.complete(request, Ok(detail(1))),
            DetailCompletion::Stale
        ));
        assert_eq!(controller.phase(), &DetailPhase::Idle);
    }
}
