//! StatusList2021 revocation.
pub mod credential;
pub mod fetcher;
pub mod status_list;

pub use credential::{
    create_status_list_credential, is_revocable, is_status_list_credential, make_revocable,
    status_list_claim, RevocationOptions, StatusList2021Claim,
};
pub use fetcher::{is_revoked, HttpStatusListFetcher, RevocationPolicy, StatusListFetcher};
pub use status_list::{
    compress_bit_string, get_status_list_position, StatusList, StatusListPosition,
    STATUS_LIST_MAX_SIZE,
};
