/*
 * @Author       : 老董
 * @Date         : 2026-10-15 15:27:18
 * @Description  : 优化器模块单元测试
 *
 * 测试按功能分组：
 * - updater: 纯函数更新规则（稠密/稀疏、校验、性质）
 * - gradient: 稀疏梯度的构造与合并
 * - learning_rate: 学习率及其调度
 * - adagrad: 有状态优化器（槽位、共享、重置、状态快照）
 * - config: JSON 配置
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19 21:36:27
 */
