use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::error::AppError;

type ResultSender<T> = broadcast::Sender<Result<T, AppError>>;

/// 进程内合并请求组
///
/// 同一个 key 上并发的回源操作只执行一次：第一个调用者负责执行，
/// 其余调用者订阅同一个结果。key 在结果发布前被移除，所以组在
/// 两次请求之间不保留任何状态，每个合并窗口恰好执行一次。
///
/// 回源操作被 spawn 到运行时上执行，等待中的调用者被取消只会丢弃
/// 自己的接收端，不影响其他等待者，也不会中断进行中的回源。
///
/// 只在进程内生效：N 个实例同时未命中同一个 key 时各自回源一次。
pub struct SingleFlight<T> {
    calls: Arc<Mutex<HashMap<String, ResultSender<T>>>>,
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 执行或加入 key 上的在途操作，返回共享的结果
    pub async fn run<F>(&self, key: &str, work: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>> + Send + 'static,
    {
        let mut receiver = {
            let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
            match calls.get(key) {
                Some(sender) => sender.subscribe(),
                None => {
                    let (sender, receiver) = broadcast::channel(1);
                    calls.insert(key.to_string(), sender.clone());

                    let calls = Arc::clone(&self.calls);
                    let key = key.to_string();
                    tokio::spawn(async move {
                        let result = work.await;
                        // 先移除 key 再发布：之后到达的调用者开启新窗口，
                        // 已订阅的调用者都能收到本次结果
                        calls
                            .lock()
                            .unwrap_or_else(|e| e.into_inner())
                            .remove(&key);
                        let _ = sender.send(result);
                    });

                    receiver
                }
            }
        };

        match receiver.recv().await {
            Ok(result) => result,
            // 发送端没发结果就关闭，只会发生在回源任务 panic 时
            Err(_) => Err(AppError::Store("coalesced fetch aborted".to_string())),
        }
    }
}
