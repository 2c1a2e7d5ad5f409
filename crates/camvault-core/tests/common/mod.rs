pub mod mock_camera;
