pub mod bayard_request;
pub mod bayard_route;
