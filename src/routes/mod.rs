pub mod company_route;
pub mod default_route;
