// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::vec::IntoIter;

/// 按批次大小切分有序集合
///
/// `batch_size` 为 `None` 或 `0` 时不分批，整个输入作为唯一一批返回
/// （空输入也会得到一个空批次）；否则按顺序产出长度为 `batch_size`
/// 的切片，最后一批可能更短，空输入不产出任何批次。
///
/// # 参数
///
/// * `items` - 待切分的元素
/// * `batch_size` - 每批的最大元素数
///
/// # 返回值
///
/// 返回按顺序产出批次的迭代器
pub fn chunk<I>(items: I, batch_size: Option<usize>) -> Chunks<I::Item>
where
    I: IntoIterator,
{
    Chunks {
        remaining: items.into_iter().collect::<Vec<_>>().into_iter(),
        batch_size: batch_size.filter(|size| *size > 0),
        whole_yielded: false,
    }
}

/// [`chunk`] 返回的批次迭代器
#[derive(Debug)]
pub struct Chunks<T> {
    remaining: IntoIter<T>,
    batch_size: Option<usize>,
    whole_yielded: bool,
}

impl<T> Iterator for Chunks<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.batch_size {
            None => {
                if self.whole_yielded {
                    return None;
                }
                self.whole_yielded = true;
                Some(self.remaining.by_ref().collect())
            }
            Some(size) => {
                let batch: Vec<T> = self.remaining.by_ref().take(size).collect();
                if batch.is_empty() {
                    None
                } else {
                    Some(batch)
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let batches = match self.batch_size {
            None if self.whole_yielded => 0,
            None => 1,
            Some(size) => self.remaining.len().div_ceil(size),
        };
        (batches, Some(batches))
    }
}

impl<T> ExactSizeIterator for Chunks<T> {}
