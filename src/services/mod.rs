pub mod mock_service;
pub mod product_service;
