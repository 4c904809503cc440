//! Player market: mood, contract asks, negotiations, AI free agency and
//! draft prospect ranking.

pub mod draft_rank;
pub mod free_agency;
pub mod mood;
pub mod negotiation;

pub use draft_rank::{compare_prospects, rank_prospects, ranked_class};
pub use free_agency::{
    ai_resign, auto_sign, decay_asks, expiring_contracts, fix_ai_rosters, open_resign_negotiations,
    refresh_asks,
};
pub use mood::{amount_with_mood, mood, mood_components, willing_to_negotiate, MoodComponents, REFUSE_MOOD};
pub use negotiation::{
    asking_amount, cancel_negotiation, expire_released_players, first_contract_season, make_free_agent,
    make_offer, release_player, start_negotiation, OfferResponse, MAX_CONTRACT_YEARS,
};

pub(crate) use negotiation::sign_player;
