pub mod vertex_service;
