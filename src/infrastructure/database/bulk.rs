// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel};

use crate::utils::batch::chunk;

/// 分批批量插入
///
/// 按 `batch_size` 切分后逐批执行 `INSERT`，空批次会被跳过
///
/// # 返回值
///
/// * `Ok(u64)` - 插入的行数
/// * `Err(DbErr)` - 任一批次失败，之前的批次不会回滚
pub async fn bulk_insert<A, C>(
    conn: &C,
    models: Vec<A>,
    batch_size: Option<usize>,
) -> Result<u64, DbErr>
where
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    let mut inserted = 0;
    for batch in chunk(models, batch_size) {
        if batch.is_empty() {
            continue;
        }
        inserted += <A::Entity as EntityTrait>::insert_many(batch)
            .exec_without_returning(conn)
            .await?;
    }
    Ok(inserted)
}
