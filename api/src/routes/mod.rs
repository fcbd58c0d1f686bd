pub mod bayard;
pub mod health_check_route;
