pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const EMBEDDING_MODEL_NAME: &str = "w600k_r50.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/w600k_r50.onnx";

pub const MATCH_LABEL: &str = "MATCH";
pub const NO_MATCH_LABEL: &str = "NO MATCH";

pub const MATCH_COLOR: [u8; 3] = [0, 255, 0];
pub const NO_MATCH_COLOR: [u8; 3] = [255, 0, 0];
