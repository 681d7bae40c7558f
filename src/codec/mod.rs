// ==========================================
// 库存二维码系统 - 编解码层
// ==========================================
// 职责: 库存记录 ↔ 二维码载荷文本
// 说明: 二维码图像的生成与像素识别由外部组件负责
// ==========================================

pub mod qr_payload;

pub use qr_payload::{CodecError, CodecResult, QrCodec, QrPayload};
