use std::io::{Read, Write};

use super::Tensor;
use crate::errors::TensorError;

// 保存和加载张量（含精度信息）
impl Tensor {
    /// 将单个Tensor写入`writer`（如本地文件）
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<(), TensorError> {
        let serialized_data =
            bincode::serialize(&self.data).map_err(|e| TensorError::Persistence(e.to_string()))?;
        writer
            .write_all(&serialized_data)
            .map_err(|e| TensorError::Persistence(e.to_string()))
    }

    /// 从`reader`（如本地文件）加载单个Tensor
    pub fn load<R: Read>(reader: &mut R) -> Result<Self, TensorError> {
        let mut serialized_data = Vec::new();
        reader
            .read_to_end(&mut serialized_data)
            .map_err(|e| TensorError::Persistence(e.to_string()))?;
        let data = bincode::deserialize(&serialized_data)
            .map_err(|e| TensorError::Persistence(e.to_string()))?;
        Ok(Self { data })
    }
}
