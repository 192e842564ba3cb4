pub(crate) mod achievements;
pub(crate) mod audit;
pub(crate) mod auth;
pub(crate) mod education;
pub(crate) mod health;
pub(crate) mod orders;
pub(crate) mod portfolios;
pub(crate) mod positions;
pub(crate) mod securities;
pub(crate) mod transactions;
pub(crate) mod users;
pub(crate) mod watchlists;
