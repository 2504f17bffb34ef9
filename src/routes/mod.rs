pub mod api_routes;
