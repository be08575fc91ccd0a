pub mod pipeline_logger;
pub mod register_reference_use_case;
pub mod stream_faces_use_case;
